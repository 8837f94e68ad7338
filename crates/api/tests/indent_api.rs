//! Integration tests for the `/indents` resource: creation gating, listing,
//! filtering, and the tracker view.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_authed, post_json};
use serde_json::json;

fn cement_indent() -> serde_json::Value {
    json!({
        "project_name": "Tower A",
        "items": [
            { "material": "Cement", "quantity": 50.0, "unit": "Bags" }
        ],
        "urgency": "High",
        "notes": "foundation pour on Friday"
    })
}

#[tokio::test]
async fn site_engineer_can_raise_an_indent() {
    let app = common::build_test_app();
    let token = common::login(&app, "se", "se123").await;

    let response = post_json(app, "/api/v1/indents", Some(&token), cement_indent()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "Raised_By_SE");
    assert_eq!(json["data"]["requested_by"], "se");
    assert_eq!(json["data"]["items"][0]["material"], "Cement");
}

#[tokio::test]
async fn only_the_site_engineer_may_create() {
    let app = common::build_test_app();
    let token = common::login(&app, "pm", "pm123").await;

    let response = post_json(app, "/api/v1/indents", Some(&token), cement_indent()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN_TRANSITION");
}

#[tokio::test]
async fn creation_requires_authentication() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/v1/indents", None, cement_indent()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_item_list_is_rejected() {
    let app = common::build_test_app();
    let token = common::login(&app, "se", "se123").await;

    let mut body = cement_indent();
    body["items"] = json!([]);

    let response = post_json(app, "/api/v1/indents", Some(&token), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn zero_quantity_is_rejected() {
    let app = common::build_test_app();
    let token = common::login(&app, "se", "se123").await;

    let mut body = cement_indent();
    body["items"][0]["quantity"] = json!(0.0);

    let response = post_json(app, "/api/v1/indents", Some(&token), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_by_status_and_project() {
    let app = common::build_test_app();
    let se = common::login(&app, "se", "se123").await;

    post_json(app.clone(), "/api/v1/indents", Some(&se), cement_indent()).await;
    let mut other = cement_indent();
    other["project_name"] = json!("Tower B");
    post_json(app.clone(), "/api/v1/indents", Some(&se), other).await;

    let response = get_authed(
        app.clone(),
        "/api/v1/indents?status=Raised_By_SE&project=Tower%20B",
        &se,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["project_name"], "Tower B");

    // Unknown status string is a client error, not an empty list.
    let response = get_authed(app, "/api/v1/indents?status=Nonsense", &se).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_indent_returns_404() {
    let app = common::build_test_app();
    let token = common::login(&app, "se", "se123").await;

    let id = uuid::Uuid::new_v4();
    let response = get_authed(app, &format!("/api/v1/indents/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn tracker_renders_ten_steps() {
    let app = common::build_test_app();
    let token = common::login(&app, "se", "se123").await;

    let response = post_json(
        app.clone(),
        "/api/v1/indents",
        Some(&token),
        cement_indent(),
    )
    .await;
    let created = body_json(response).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = get_authed(app, &format!("/api/v1/indents/{id}/tracker"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let steps = json["data"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 10);
    assert_eq!(steps[0]["state"], "complete");
    assert_eq!(steps[1]["state"], "pending");
}

#[tokio::test]
async fn pm_inbox_shows_freshly_raised_indents() {
    let app = common::build_test_app();
    let se = common::login(&app, "se", "se123").await;
    let pm = common::login(&app, "pm", "pm123").await;

    post_json(app.clone(), "/api/v1/indents", Some(&se), cement_indent()).await;

    let response = get_authed(app.clone(), "/api/v1/indents/inbox", &pm).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // The MD has nothing to act on yet.
    let md = common::login(&app, "md", "md123").await;
    let response = get_authed(app, "/api/v1/indents/inbox", &md).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
