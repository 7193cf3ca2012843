//! Integration tests for restaurants, menus, categories, items and the
//! public menu view.
//!
//! These tests require a running PostgreSQL instance (`TEST_DATABASE_URL`).

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_category, create_item, create_menu, create_restaurant, create_test_app,
    create_test_pool, delete_request_with_auth, get_request_with_auth, json_request_with_auth,
    new_owner, public_request, send, test_config,
};
use serde_json::json;

const IPHONE_UA: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_restaurant_crud() {
    let app = create_test_app(test_config(), create_test_pool().await);
    let (_, token) = new_owner();

    let (status, body) = send(
        &app,
        json_request_with_auth(
            Method::POST,
            "/api/v1/restaurants",
            json!({ "name": "Trattoria Roma", "address": "Via Appia 1" }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["is_active"], true);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/restaurants/{}", id),
            json!({ "name": "Trattoria Milano" }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Trattoria Milano");
    assert_eq!(body["address"], "Via Appia 1");

    let (status, body) = send(&app, get_request_with_auth("/api/v1/restaurants", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, _) = send(
        &app,
        delete_request_with_auth(&format!("/api/v1/restaurants/{}", id), &token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        get_request_with_auth(&format!("/api/v1/restaurants/{}", id), &token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_restaurant_limit_per_owner() {
    let app = create_test_app(test_config(), create_test_pool().await);
    let (_, token) = new_owner();

    // The test configuration allows three restaurants per owner
    for _ in 0..3 {
        create_restaurant(&app, &token).await;
    }

    let (status, body) = send(
        &app,
        json_request_with_auth(
            Method::POST,
            "/api/v1/restaurants",
            json!({ "name": "One too many" }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_other_owner_resources_are_not_found() {
    let app = create_test_app(test_config(), create_test_pool().await);
    let (_, owner_token) = new_owner();
    let (_, intruder_token) = new_owner();

    let restaurant_id = create_restaurant(&app, &owner_token).await;
    let menu_id = create_menu(&app, &owner_token, &restaurant_id).await;
    let category_id = create_category(&app, &owner_token, &menu_id, "Starters").await;
    let item_id = create_item(&app, &owner_token, &category_id, "Bruschetta", 650).await;

    for uri in [
        format!("/api/v1/restaurants/{}", restaurant_id),
        format!("/api/v1/restaurants/{}/menus", restaurant_id),
        format!("/api/v1/menus/{}", menu_id),
        format!("/api/v1/menus/{}/categories", menu_id),
        format!("/api/v1/categories/{}/items", category_id),
        format!("/api/v1/items/{}", item_id),
        format!("/api/v1/analytics?menu_id={}", menu_id),
    ] {
        let (status, _) = send(&app, get_request_with_auth(&uri, &intruder_token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let (status, _) = send(
        &app,
        delete_request_with_auth(&format!("/api/v1/items/{}", item_id), &intruder_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still there for its owner
    let (status, _) = send(
        &app,
        get_request_with_auth(&format!("/api/v1/items/{}", item_id), &owner_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_reorder_categories_and_items() {
    let app = create_test_app(test_config(), create_test_pool().await);
    let (_, token) = new_owner();
    let restaurant_id = create_restaurant(&app, &token).await;
    let menu_id = create_menu(&app, &token, &restaurant_id).await;

    let starters = create_category(&app, &token, &menu_id, "Starters").await;
    let mains = create_category(&app, &token, &menu_id, "Mains").await;
    let desserts = create_category(&app, &token, &menu_id, "Desserts").await;

    let (status, _) = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/menus/{}/categories/order", menu_id),
            json!({ "ids": [desserts, starters, mains] }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        &app,
        get_request_with_auth(&format!("/api/v1/menus/{}/categories", menu_id), &token),
    )
    .await;
    let names: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Desserts", "Starters", "Mains"]);

    // A category of another menu makes the whole reorder fail
    let other_menu = create_menu(&app, &token, &restaurant_id).await;
    let foreign = create_category(&app, &token, &other_menu, "Drinks").await;
    let (status, _) = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/menus/{}/categories/order", menu_id),
            json!({ "ids": [starters, foreign] }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        get_request_with_auth(&format!("/api/v1/menus/{}/categories", menu_id), &token),
    )
    .await;
    assert_eq!(body["categories"][0]["name"], "Desserts");

    let tiramisu = create_item(&app, &token, &desserts, "Tiramisu", 700).await;
    let panna_cotta = create_item(&app, &token, &desserts, "Panna cotta", 650).await;
    let (status, _) = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/categories/{}/items/order", desserts),
            json!({ "ids": [panna_cotta, tiramisu] }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        &app,
        get_request_with_auth(&format!("/api/v1/categories/{}/items", desserts), &token),
    )
    .await;
    assert_eq!(body["items"][0]["name"], "Panna cotta");
    assert_eq!(body["items"][1]["name"], "Tiramisu");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_public_menu_view() {
    let app = create_test_app(test_config(), create_test_pool().await);
    let (_, token) = new_owner();
    let restaurant_id = create_restaurant(&app, &token).await;
    let menu_id = create_menu(&app, &token, &restaurant_id).await;
    let starters = create_category(&app, &token, &menu_id, "Starters").await;
    create_item(&app, &token, &starters, "Bruschetta", 650).await;
    let sold_out = create_item(&app, &token, &starters, "Arancini", 700).await;

    let (status, _) = send(
        &app,
        json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/items/{}", sold_out),
            json!({ "is_available": false }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        public_request(
            Method::GET,
            &format!("/api/v1/public/menus/{}", menu_id),
            Some(IPHONE_UA),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["menu_id"], menu_id.as_str());
    assert!(body["restaurant"]["name"].is_string());
    let items = body["categories"][0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Bruschetta");
    assert_eq!(items[0]["price_cents"], 650);

    // Deactivated menus disappear from the public view
    let (status, _) = send(
        &app,
        json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/menus/{}", menu_id),
            json!({ "is_active": false }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        public_request(Method::GET, &format!("/api/v1/public/menus/{}", menu_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_public_views_feed_analytics() {
    let app = create_test_app(test_config(), create_test_pool().await);
    let (_, token) = new_owner();
    let restaurant_id = create_restaurant(&app, &token).await;
    let menu_id = create_menu(&app, &token, &restaurant_id).await;
    let starters = create_category(&app, &token, &menu_id, "Starters").await;
    let bruschetta = create_item(&app, &token, &starters, "Bruschetta", 650).await;
    let olives = create_item(&app, &token, &starters, "Olives", 400).await;

    for _ in 0..3 {
        let (status, _) = send(
            &app,
            public_request(
                Method::GET,
                &format!("/api/v1/public/menus/{}?source=social", menu_id),
                Some(IPHONE_UA),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    for (item, views) in [(&olives, 2), (&bruschetta, 1)] {
        for _ in 0..views {
            let (status, _) = send(
                &app,
                public_request(Method::POST, &format!("/api/v1/public/items/{}/view", item), None),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }
    }
    let (status, _) = send(
        &app,
        public_request(
            Method::POST,
            &format!("/api/v1/public/categories/{}/view", starters),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        get_request_with_auth(
            &format!("/api/v1/analytics?range=week&restaurant_id={}", restaurant_id),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_scans"], 3);
    assert_eq!(body["summary"]["qr_scans"], 0);
    assert_eq!(body["by_device"]["mobile"], 3);
    assert_eq!(body["by_source"]["social"], 3);

    let daily = body["daily"].as_array().unwrap();
    assert_eq!(daily.len(), 7);
    assert_eq!(daily[6]["scans"], 3);

    assert_eq!(body["popular_items"][0]["name"], "Olives");
    assert_eq!(body["popular_items"][0]["views"], 2);
    assert_eq!(body["popular_categories"][0]["views"], 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_view_of_unknown_item() {
    let app = create_test_app(test_config(), create_test_pool().await);

    let (status, _) = send(
        &app,
        public_request(
            Method::POST,
            &format!("/api/v1/public/items/{}/view", uuid::Uuid::new_v4()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_views_not_counted_under_inactive_menu() {
    let app = create_test_app(test_config(), create_test_pool().await);
    let (_, token) = new_owner();
    let restaurant_id = create_restaurant(&app, &token).await;
    let menu_id = create_menu(&app, &token, &restaurant_id).await;
    let starters = create_category(&app, &token, &menu_id, "Starters").await;
    let olives = create_item(&app, &token, &starters, "Olives", 400).await;

    let (status, _) = send(
        &app,
        json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/menus/{}", menu_id),
            json!({ "is_active": false }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        public_request(Method::POST, &format!("/api/v1/public/items/{}/view", olives), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        public_request(
            Method::POST,
            &format!("/api/v1/public/categories/{}/view", starters),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        get_request_with_auth(&format!("/api/v1/items/{}", olives), &token),
    )
    .await;
    assert_eq!(body["view_count"], 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_patch_null_clears_optional_fields() {
    let app = create_test_app(test_config(), create_test_pool().await);
    let (_, token) = new_owner();
    let restaurant_id = create_restaurant(&app, &token).await;
    let menu_id = create_menu(&app, &token, &restaurant_id).await;
    let starters = create_category(&app, &token, &menu_id, "Starters").await;
    let soup = create_item(&app, &token, &starters, "Soup", 550).await;
    let item_path = format!("/api/v1/items/{}", soup);

    let (status, body) = send(
        &app,
        json_request_with_auth(
            Method::PATCH,
            &item_path,
            json!({
                "description": "Tomato and basil",
                "image_url": "https://cdn.example.com/soup.jpg"
            }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Tomato and basil");

    // Absent fields are left alone
    let (_, body) = send(
        &app,
        json_request_with_auth(Method::PATCH, &item_path, json!({ "price_cents": 600 }), &token),
    )
    .await;
    assert_eq!(body["description"], "Tomato and basil");
    assert_eq!(body["image_url"], "https://cdn.example.com/soup.jpg");

    let (status, body) = send(
        &app,
        json_request_with_auth(
            Method::PATCH,
            &item_path,
            json!({ "description": null, "image_url": null }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["description"].is_null());
    assert!(body["image_url"].is_null());
    assert_eq!(body["price_cents"], 600);

    let (status, body) = send(
        &app,
        json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/restaurants/{}", restaurant_id),
            json!({ "phone": "+39 06 123456" }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "+39 06 123456");

    let (_, body) = send(
        &app,
        json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/restaurants/{}", restaurant_id),
            json!({ "phone": null }),
            &token,
        ),
    )
    .await;
    assert!(body["phone"].is_null());
}
