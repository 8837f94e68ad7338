//! Integration tests for project cost roll-ups.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, get_authed, post_json};
use serde_json::json;

async fn raise_and_price(app: &Router, se: &str, pm: &str, qs: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/indents",
        Some(se),
        json!({
            "project_name": "Tower A",
            "items": [
                { "material": "Cement", "quantity": 50.0, "unit": "Bags" }
            ],
            "urgency": "Medium"
        }),
    )
    .await;
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    post_json(
        app.clone(),
        &format!("/api/v1/indents/{id}/transition"),
        Some(pm),
        json!({
            "expected_status": "Raised_By_SE",
            "action": "pm_approve",
            "pm_comments": "ok"
        }),
    )
    .await;
    post_json(
        app.clone(),
        &format!("/api/v1/indents/{id}/transition"),
        Some(qs),
        json!({
            "expected_status": "Approved_By_PM",
            "action": "qs_complete",
            "items": [
                { "material": "Cement", "quantity": 50.0, "unit": "Bags", "target_rate": 385.0 }
            ],
            "market_analysis": "stable",
            "costing_comments": "ok"
        }),
    )
    .await;
    id
}

#[tokio::test]
async fn priced_indents_sum_into_the_project_total() {
    let app = common::build_test_app();
    let se = common::login(&app, "se", "se123").await;
    let pm = common::login(&app, "pm", "pm123").await;
    let qs = common::login(&app, "qs", "qs123").await;

    raise_and_price(&app, &se, &pm, &qs).await;

    let response = get_authed(app, "/api/v1/costs/Tower%20A", &pm).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["indents_counted"], 1);
    // 50 bags × 385 target rate.
    assert_eq!(json["data"]["estimated_total"], 19250.0);
}

#[tokio::test]
async fn unpriced_indents_contribute_zero() {
    let app = common::build_test_app();
    let se = common::login(&app, "se", "se123").await;

    post_json(
        app.clone(),
        "/api/v1/indents",
        Some(&se),
        json!({
            "project_name": "Tower A",
            "items": [
                { "material": "Steel", "quantity": 2.0, "unit": "Tonnes" }
            ],
            "urgency": "Low"
        }),
    )
    .await;

    let response = get_authed(app, "/api/v1/costs/Tower%20A", &se).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["indents_counted"], 1);
    assert_eq!(json["data"]["estimated_total"], 0.0);
}

#[tokio::test]
async fn rejected_indents_are_excluded() {
    let app = common::build_test_app();
    let se = common::login(&app, "se", "se123").await;
    let pm = common::login(&app, "pm", "pm123").await;

    let response = post_json(
        app.clone(),
        "/api/v1/indents",
        Some(&se),
        json!({
            "project_name": "Tower A",
            "items": [
                { "material": "Cement", "quantity": 10.0, "unit": "Bags" }
            ],
            "urgency": "Low"
        }),
    )
    .await;
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    post_json(
        app.clone(),
        &format!("/api/v1/indents/{id}/transition"),
        Some(&pm),
        json!({
            "expected_status": "Raised_By_SE",
            "action": "pm_reject",
            "pm_comments": "duplicate"
        }),
    )
    .await;

    let response = get_authed(app, "/api/v1/costs/Tower%20A", &pm).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["indents_counted"], 0);
    assert_eq!(json["data"]["estimated_total"], 0.0);
}
