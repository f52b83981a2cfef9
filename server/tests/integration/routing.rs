use reqwest::StatusCode;

use crate::helpers::TestApi;

#[tokio::test]
async fn login_only_accepts_post() {
    let api = TestApi::spawn().await;

    for path in ["/login", "/logout"] {
        let response = api.get(path, None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{path}");
        assert_eq!(response.headers()["allow"].to_str().unwrap(), "POST", "{path}");
    }
    api.stop().await;
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let api = TestApi::spawn().await;

    let response = api.get("/does-not-exist", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    api.stop().await;
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let api = TestApi::spawn().await;

    let first = api.get("/health", None).await;
    let second = api.get("/nope", None).await;

    let first = first.headers()["x-request-id"].to_str().unwrap().to_owned();
    let second = second.headers()["x-request-id"].to_str().unwrap().to_owned();
    assert_eq!(first.len(), 36);
    assert_ne!(first, second);
    api.stop().await;
}
