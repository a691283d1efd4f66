// ABOUTME: HTTP integration tests for ingredient search, health and media serving
// ABOUTME: Checks prefix-first ordering, lookup by id and the liveness endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;
mod helpers;

use axum::http::StatusCode;
use cookbook_server::media::{DataUri, MediaDir};
use cookbook_server::server::build_router;
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

#[tokio::test]
async fn test_search_puts_prefix_matches_first() {
    let (resources, _media) = common::create_test_resources().await.unwrap();
    for name in ["сахар", "ванильный сахар", "соль", "Sugar"] {
        common::create_ingredient(&resources.database, name, "г")
            .await
            .unwrap();
    }
    let app = build_router(resources);

    let found: Vec<Value> = AxumTestRequest::get("/api/ingredients/?name=%D0%A1%D0%B0%D1%85")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let names: Vec<&str> = found.iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["сахар", "ванильный сахар"]);

    let all: Vec<Value> = AxumTestRequest::get("/api/ingredients/")
        .send(app)
        .await
        .json();
    assert_eq!(all.len(), 4);
    assert!(all[0].get("measurement_unit").is_some());
}

#[tokio::test]
async fn test_get_ingredient_by_id() {
    let (resources, _media) = common::create_test_resources().await.unwrap();
    let salt = common::create_ingredient(&resources.database, "salt", "g")
        .await
        .unwrap();
    let app = build_router(resources);

    let body: Value = AxumTestRequest::get(&format!("/api/ingredients/{}/", salt.id))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["name"], "salt");
    assert_eq!(body["measurement_unit"], "g");

    let missing: Value = AxumTestRequest::get("/api/ingredients/777/")
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(missing["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_health_reports_database() {
    let (resources, _media) = common::create_test_resources().await.unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::get("/health")
        .send(app)
        .await
        .assert_status(StatusCode::OK);
    assert!(response.header("x-request-id").is_some());
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_media_files_are_served() {
    let (resources, _media) = common::create_test_resources().await.unwrap();
    let image = DataUri::parse(common::TEST_IMAGE, "image").unwrap();
    let relative = resources
        .media
        .save(MediaDir::RecipeImages, &image)
        .await
        .unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::get(&format!("/media/{relative}"))
        .send(app)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("image/gif"));
}
