// ============================================================================
// Item Endpoint Tests
// ============================================================================
//
// - tag normalization ("dairy, urgent" -> ["dairy", "urgent"])
// - partial updates only touch the fields they name
// - tri-state priority: null clears, omission leaves alone
// - toggle-complete
//
// ============================================================================

use reqwest::Method;
use serde_json::{Value, json};

use test_utils::{TestApp, error_detail, spawn_app};

async fn list_with_item(app: &TestApp, token: &str, item: Value) -> (i64, Value) {
    let list = app.create_list(token, "Groceries").await;
    let list_id = list["id"].as_i64().unwrap();
    let item = app.create_item(token, list_id, item).await;
    (list_id, item)
}

async fn patch_item(app: &TestApp, token: &str, item_id: &Value, body: Value) -> reqwest::Response {
    app.request(Method::PATCH, &format!("/api/items/{}", item_id), token)
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_item_normalizes_fields() {
    let app = spawn_app().await;
    let token = app.token("alice");

    let (list_id, item) = list_with_item(
        &app,
        &token,
        json!({
            "text": "  Milk ",
            "description": "   ",
            "tags": "dairy, urgent, ,dairy",
            "priority": "high",
            "dueDate": "2026-11-01"
        }),
    )
    .await;

    assert_eq!(item["text"], "Milk");
    assert_eq!(item["description"], Value::Null);
    assert_eq!(item["tags"], json!(["dairy", "urgent"]));
    assert_eq!(item["status"], "not_started");
    assert_eq!(item["priority"], "high");
    assert_eq!(item["dueDate"], "2026-11-01");
    assert_eq!(item["listId"], list_id);
    assert_eq!(item["createdBy"], "alice");
    assert_eq!(item["deletedAt"], Value::Null);
}

#[tokio::test]
async fn test_invalid_items_are_rejected() {
    let app = spawn_app().await;
    let token = app.token("alice");
    let list = app.create_list(&token, "Groceries").await;

    for body in [
        json!({ "text": "" }),
        json!({ "text": "x".repeat(501) }),
        json!({ "text": "Milk", "description": "d".repeat(2001) }),
        json!({ "text": "Milk", "tags": " , ," }),
        json!({ "text": "Milk", "tags": "   " }),
        json!({ "text": "Milk", "status": "done" }),
        json!({ "text": "Milk", "priority": "urgent" }),
        json!({ "text": "Milk", "dueDate": "2026-13-45" }),
    ] {
        let response = app
            .request(Method::POST, &format!("/api/lists/{}/items", list["id"]), &token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "body: {}", body);
    }

    let response = app
        .request(Method::POST, &format!("/api/lists/{}/items", list["id"]), &token)
        .header("Content-Type", "application/json")
        .body("{broken")
        .send()
        .await
        .unwrap();
    let (status, _) = error_detail(response).await;
    assert_eq!(status, 400);

    assert!(app.list_items(&token, list["id"].as_i64().unwrap()).await.is_empty());
}

#[tokio::test]
async fn test_items_in_foreign_list_are_forbidden() {
    let app = spawn_app().await;
    let alice = app.token("alice");
    let bob = app.token("bob");
    let (list_id, item) = list_with_item(&app, &alice, json!({ "text": "Milk" })).await;

    let response = app
        .request(Method::POST, &format!("/api/lists/{}/items", list_id), &bob)
        .json(&json!({ "text": "Sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = patch_item(&app, &bob, &item["id"], json!({ "status": "completed" })).await;
    assert_eq!(response.status(), 403);

    let response = app
        .request(Method::POST, "/api/lists/9999/items", &bob)
        .json(&json!({ "text": "Nowhere" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_status_update_leaves_other_fields_untouched() {
    let app = spawn_app().await;
    let token = app.token("alice");
    let (_, item) = list_with_item(
        &app,
        &token,
        json!({
            "text": "Milk",
            "description": "2 litres",
            "tags": ["dairy", "urgent"],
            "priority": "medium",
            "dueDate": "2026-11-01"
        }),
    )
    .await;

    let response = patch_item(&app, &token, &item["id"], json!({ "status": "in_progress" })).await;
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();

    assert_eq!(updated["status"], "in_progress");
    for field in ["text", "description", "tags", "priority", "dueDate", "createdAt"] {
        assert_eq!(updated[field], item[field], "field {} changed", field);
    }
}

#[tokio::test]
async fn test_priority_null_clears_and_omission_keeps() {
    let app = spawn_app().await;
    let token = app.token("alice");
    let (_, item) = list_with_item(
        &app,
        &token,
        json!({ "text": "Milk", "priority": "high", "dueDate": "2026-11-01" }),
    )
    .await;

    let response = patch_item(&app, &token, &item["id"], json!({ "text": "Oat milk" })).await;
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["priority"], "high");
    assert_eq!(updated["text"], "Oat milk");

    let response = patch_item(&app, &token, &item["id"], json!({ "priority": null })).await;
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["priority"], Value::Null);
    assert_eq!(updated["dueDate"], "2026-11-01");

    let response = patch_item(&app, &token, &item["id"], json!({ "dueDate": null })).await;
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["dueDate"], Value::Null);
}

#[tokio::test]
async fn test_tags_and_description_updates() {
    let app = spawn_app().await;
    let token = app.token("alice");
    let (_, item) = list_with_item(
        &app,
        &token,
        json!({ "text": "Milk", "tags": "dairy", "description": "2 litres" }),
    )
    .await;

    let response = patch_item(
        &app,
        &token,
        &item["id"],
        json!({ "tags": "fridge,  dairy ", "description": "" }),
    )
    .await;
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["tags"], json!(["fridge", "dairy"]));
    assert_eq!(updated["description"], Value::Null);

    let response = patch_item(&app, &token, &item["id"], json!({ "tags": "" })).await;
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["tags"], json!([]));
}

#[tokio::test]
async fn test_empty_or_clearing_required_fields_is_rejected() {
    let app = spawn_app().await;
    let token = app.token("alice");
    let (_, item) = list_with_item(&app, &token, json!({ "text": "Milk" })).await;

    for body in [json!({}), json!({ "text": null }), json!({ "status": null })] {
        let response = patch_item(&app, &token, &item["id"], body.clone()).await;
        assert_eq!(response.status(), 400, "body: {}", body);
    }
}

#[tokio::test]
async fn test_toggle_complete() {
    let app = spawn_app().await;
    let token = app.token("alice");
    let (_, item) = list_with_item(&app, &token, json!({ "text": "Milk", "status": "in_progress" })).await;
    let path = format!("/api/items/{}/toggle-complete", item["id"]);

    let toggled: Value = app
        .request(Method::PATCH, &path, &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["status"], "completed");

    let toggled: Value = app
        .request(Method::PATCH, &path, &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["status"], "not_started");
}

#[tokio::test]
async fn test_items_are_listed_oldest_first() {
    let app = spawn_app().await;
    let token = app.token("alice");
    let list = app.create_list(&token, "Groceries").await;
    let list_id = list["id"].as_i64().unwrap();

    for text in ["Milk", "Eggs", "Bread"] {
        app.create_item(&token, list_id, json!({ "text": text })).await;
        app.clock.advance(chrono::Duration::seconds(1));
    }

    let texts: Vec<Value> = app
        .list_items(&token, list_id)
        .await
        .into_iter()
        .map(|item| item["text"].clone())
        .collect();
    assert_eq!(texts, vec![json!("Milk"), json!("Eggs"), json!("Bread")]);
}
