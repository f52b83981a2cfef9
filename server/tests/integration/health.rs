use reqwest::StatusCode;

use crate::helpers::TestApi;

#[tokio::test]
async fn health_check_works() {
    let api = TestApi::spawn().await;

    let response = api.get("/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.text().await.unwrap(), "healthy");
    api.stop().await;
}
