use googletest::prelude::*;
use reqwest::StatusCode;

use crate::helpers::TestApi;

#[tokio::test]
async fn the_index_page_describes_the_request_and_the_instance() {
    let api = TestApi::spawn().await;

    let response = api
        .api_client
        .get(format!("{}/", api.api_address))
        .header("x-custom", "<b>bold</b>")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/html; charset=utf-8"
    );
    let page = response.text().await.unwrap();
    // Colour and served-from address come from `test.yml`.
    assert_that!(page, contains_substring(r#"<h1 style="color: teal">"#));
    assert_that!(page, contains_substring("<h3>Served from 10.0.0.7</h3>"));
    assert_that!(page, contains_substring("<h2>Your IP - 127.0.0.1:"));
    assert_that!(page, contains_substring("x-custom: &lt;b&gt;bold&lt;/b&gt;<br/>"));
    assert_that!(page, contains_substring(r#"action="/login""#));
    api.stop().await;
}
