mod common;

use common::TestApp;
use reqwest::Method;
use serde_json::{json, Value};

fn assert_cors_headers(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .expect("allow-origin header"),
        "*"
    );
    assert_eq!(
        headers
            .get("access-control-allow-headers")
            .expect("allow-headers header"),
        "Origin, X-Requested-With, Content-Type, Accept"
    );
    assert_eq!(
        headers
            .get("access-control-allow-methods")
            .expect("allow-methods header"),
        "GET,POST,OPTIONS"
    );
}

#[tokio::test]
async fn preflight_returns_an_empty_204_with_the_cors_headers() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .request(Method::OPTIONS, app.generate_url())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), 204);
    assert_cors_headers(&response);

    let body = response.text().await.expect("Failed to read body");
    assert!(body.is_empty());
}

#[tokio::test]
async fn preflight_ignores_whatever_body_it_is_sent() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    // Even a malformed JSON body never reaches a parser on OPTIONS.
    let response = client
        .request(Method::OPTIONS, app.generate_url())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), 204);
    assert_cors_headers(&response);
}

#[tokio::test]
async fn preflight_is_answered_on_any_path() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/health", "/anything/else"] {
        let response = client
            .request(Method::OPTIONS, format!("{}{}", app.address, path))
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(response.status(), 204, "unexpected status for {}", path);
        assert_cors_headers(&response);
    }
}

#[tokio::test]
async fn success_responses_carry_the_cors_headers() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(app.generate_url())
        .json(&json!({ "prompt": "Describe a rainy street." }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), 200);
    assert_cors_headers(&response);
}

#[tokio::test]
async fn error_responses_carry_the_cors_headers() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(app.generate_url())
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), 400);
    assert_cors_headers(&response);
}

#[tokio::test]
async fn non_post_methods_on_the_endpoint_return_405() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let response = client
            .request(method.clone(), app.generate_url())
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(response.status(), 405, "unexpected status for {}", method);
        assert_cors_headers(&response);

        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["error"], "Only POST allowed");
    }
}
