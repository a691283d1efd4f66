// ABOUTME: Integration tests for recipe persistence
// ABOUTME: Covers transactional line replacement, rollback and list filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use cookbook_server::models::{IngredientAmount, RecipeChanges, RecipeCollection, RecipeFilter};
use cookbook_server::pagination::PageRequest;

fn page(limit: u32) -> PageRequest {
    PageRequest { page: 1, limit }
}

#[tokio::test]
async fn test_create_recipe_stores_lines_in_order() {
    let database = common::create_test_database().await.unwrap();
    let author = common::create_test_user(&database, "author").await.unwrap();
    let flour = common::create_ingredient(&database, "flour", "g").await.unwrap();
    let eggs = common::create_ingredient(&database, "eggs", "pcs").await.unwrap();

    let recipe = common::create_recipe(
        &database,
        &author,
        "Pancakes",
        &[(flour.id, 200), (eggs.id, 2)],
    )
    .await
    .unwrap();

    let lines = database.recipes().ingredients(recipe.id).await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name, "flour");
    assert_eq!(lines[0].amount, 200);
    assert_eq!(lines[1].measurement_unit, "pcs");

    let stored = database.recipes().get(recipe.id).await.unwrap().unwrap();
    assert_eq!(stored, recipe);
}

#[tokio::test]
async fn test_update_replaces_every_line() {
    let database = common::create_test_database().await.unwrap();
    let author = common::create_test_user(&database, "author").await.unwrap();
    let flour = common::create_ingredient(&database, "flour", "g").await.unwrap();
    let milk = common::create_ingredient(&database, "milk", "ml").await.unwrap();

    let recipe = common::create_recipe(&database, &author, "Batter", &[(flour.id, 100)])
        .await
        .unwrap();

    let updated = database
        .recipes()
        .update(
            recipe.id,
            &RecipeChanges {
                name: Some("Thin batter".to_owned()),
                text: None,
                cooking_time: None,
                image: None,
                ingredients: vec![IngredientAmount {
                    id: milk.id,
                    amount: 300,
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Thin batter");
    assert_eq!(updated.text, recipe.text);
    assert_eq!(updated.cooking_time, recipe.cooking_time);

    let lines = database.recipes().ingredients(recipe.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, milk.id);
    assert_eq!(lines[0].amount, 300);
}

#[tokio::test]
async fn test_failed_update_leaves_lines_untouched() {
    let database = common::create_test_database().await.unwrap();
    let author = common::create_test_user(&database, "author").await.unwrap();
    let salt = common::create_ingredient(&database, "salt", "g").await.unwrap();

    let recipe = common::create_recipe(&database, &author, "Brine", &[(salt.id, 30)])
        .await
        .unwrap();

    let repeated = vec![
        IngredientAmount {
            id: salt.id,
            amount: 1,
        },
        IngredientAmount {
            id: salt.id,
            amount: 2,
        },
    ];
    let result = database
        .recipes()
        .update(
            recipe.id,
            &RecipeChanges {
                name: Some("Changed".to_owned()),
                text: None,
                cooking_time: None,
                image: None,
                ingredients: repeated,
            },
        )
        .await;
    assert!(result.is_err());

    let stored = database.recipes().get(recipe.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Brine");
    let lines = database.recipes().ingredients(recipe.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].amount, 30);
}

#[tokio::test]
async fn test_update_missing_recipe_is_not_found() {
    let database = common::create_test_database().await.unwrap();
    let error = database
        .recipes()
        .update(
            404,
            &RecipeChanges {
                name: None,
                text: None,
                cooking_time: None,
                image: None,
                ingredients: Vec::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.http_status(), 404);
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let database = common::create_test_database().await.unwrap();
    let alice = common::create_test_user(&database, "alice").await.unwrap();
    let bob = common::create_test_user(&database, "bob").await.unwrap();
    let salt = common::create_ingredient(&database, "salt", "g").await.unwrap();

    let soup = common::create_recipe(&database, &alice, "Soup", &[(salt.id, 5)])
        .await
        .unwrap();
    let stew = common::create_recipe(&database, &alice, "Stew", &[(salt.id, 7)])
        .await
        .unwrap();
    let pie = common::create_recipe(&database, &bob, "Pie", &[(salt.id, 1)])
        .await
        .unwrap();

    database
        .collections()
        .add(RecipeCollection::Favorites, bob.id, soup.id)
        .await
        .unwrap();

    let recipes = database.recipes();

    // Newest first
    let (all, count) = recipes
        .list(&RecipeFilter::default(), None, &page(10))
        .await
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(all[0].id, pie.id);

    let by_author = RecipeFilter {
        author: Some(alice.id),
        ..RecipeFilter::default()
    };
    let (alices, count) = recipes.list(&by_author, None, &page(10)).await.unwrap();
    assert_eq!(count, 2);
    assert!(alices.iter().all(|r| r.author_id == alice.id));

    let by_name = RecipeFilter {
        name: Some("Stew".to_owned()),
        ..RecipeFilter::default()
    };
    let (named, _) = recipes.list(&by_name, None, &page(10)).await.unwrap();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].id, stew.id);

    let favorited = RecipeFilter {
        is_favorited: Some(true),
        ..RecipeFilter::default()
    };
    let (favorites, count) = recipes.list(&favorited, Some(bob.id), &page(10)).await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(favorites[0].id, soup.id);

    // Anonymous viewers get the unfiltered collection
    let (_, count) = recipes.list(&favorited, None, &page(10)).await.unwrap();
    assert_eq!(count, 3);

    let not_favorited = RecipeFilter {
        is_favorited: Some(false),
        ..RecipeFilter::default()
    };
    let (others, count) = recipes
        .list(&not_favorited, Some(bob.id), &page(10))
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert!(others.iter().all(|r| r.id != soup.id));

    let (first_page, count) = recipes
        .list(&RecipeFilter::default(), None, &page(2))
        .await
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(first_page.len(), 2);
    let second = PageRequest { page: 2, limit: 2 };
    let (second_page, _) = recipes
        .list(&RecipeFilter::default(), None, &second)
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
}

#[tokio::test]
async fn test_author_listing_and_delete_cascade() {
    let database = common::create_test_database().await.unwrap();
    let author = common::create_test_user(&database, "author").await.unwrap();
    let fan = common::create_test_user(&database, "fan").await.unwrap();
    let salt = common::create_ingredient(&database, "salt", "g").await.unwrap();

    let first = common::create_recipe(&database, &author, "First", &[(salt.id, 1)])
        .await
        .unwrap();
    common::create_recipe(&database, &author, "Second", &[(salt.id, 2)])
        .await
        .unwrap();

    let recipes = database.recipes();
    assert_eq!(recipes.count_by_author(author.id).await.unwrap(), 2);
    assert_eq!(recipes.list_by_author(author.id, Some(1)).await.unwrap().len(), 1);
    assert_eq!(recipes.list_by_author(author.id, None).await.unwrap().len(), 2);

    database
        .collections()
        .add(RecipeCollection::ShoppingCart, fan.id, first.id)
        .await
        .unwrap();
    assert!(recipes.delete(first.id).await.unwrap());
    assert!(!recipes.delete(first.id).await.unwrap());
    assert!(!database
        .collections()
        .contains(RecipeCollection::ShoppingCart, fan.id, first.id)
        .await
        .unwrap());
    assert!(recipes.ingredients(first.id).await.unwrap().is_empty());
}
