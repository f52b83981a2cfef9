use googletest::prelude::*;
use reqwest::StatusCode;

use crate::helpers::{TestApi, location, set_cookie_header, set_cookie_pair};

#[tokio::test]
async fn login_internal_logout_round_trip() {
    let api = TestApi::spawn().await;

    // Log in.
    let response = api.post_login("alice", "secret").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/internal");
    let session = set_cookie_pair(&response).expect("Login didn't set a cookie");
    assert_that!(session, starts_with("session="));

    // The internal page knows who we are.
    let response = api.get("/internal", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();
    assert_that!(page, contains_substring("<small>User: alice</small>"));

    // The index page sends us straight to the internal one.
    let response = api.get("/", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/internal");

    // Log out: the client is told to drop the cookie.
    let response = api.post_logout(Some(&session)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    let cleared = set_cookie_header(&response);
    assert_that!(cleared, starts_with("session=;"));
    assert_that!(cleared, contains_substring("Max-Age=-1"));

    // Without the cookie we are anonymous again.
    let response = api.get("/internal", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    api.stop().await;
}

#[tokio::test]
async fn internal_page_requires_a_session() {
    let api = TestApi::spawn().await;

    let response = api.get("/internal", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    api.stop().await;
}

#[tokio::test]
async fn garbage_session_cookies_are_ignored() {
    let api = TestApi::spawn().await;

    for cookie in ["session=garbage", "session=", "session=AAAA|BBBB|CCCC"] {
        let response = api.get("/internal", Some(cookie)).await;
        assert_eq!(response.status(), StatusCode::FOUND, "{cookie}");
        assert_eq!(location(&response), "/", "{cookie}");
    }
    api.stop().await;
}

#[tokio::test]
async fn a_tampered_session_cookie_is_rejected() {
    let api = TestApi::spawn().await;
    let response = api.post_login("alice", "secret").await;
    let session = set_cookie_pair(&response).unwrap();

    // Swap one character in the middle of the token.
    let middle = session.len() / 2;
    let replacement = if &session[middle..=middle] == "A" { "B" } else { "A" };
    let mut tampered = session.clone();
    tampered.replace_range(middle..=middle, replacement);

    let response = api.get("/internal", Some(&tampered)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    api.stop().await;
}

#[tokio::test]
async fn empty_credentials_do_not_start_a_session() {
    let api = TestApi::spawn().await;

    for (name, password) in [("", ""), ("alice", ""), ("", "secret")] {
        let response = api.post_login(name, password).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/");
        assert_that!(set_cookie_pair(&response), none());
    }
    api.stop().await;
}

#[tokio::test]
async fn logging_out_without_a_session_still_clears_the_cookie() {
    let api = TestApi::spawn().await;

    let response = api.post_logout(None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    assert_that!(set_cookie_header(&response), contains_substring("Max-Age=-1"));
    api.stop().await;
}

#[tokio::test]
async fn multipart_login_forms_start_a_session() {
    let api = TestApi::spawn().await;
    let body = "--form-boundary\r\n\
        Content-Disposition: form-data; name=\"name\"\r\n\r\nalice\r\n\
        --form-boundary\r\n\
        Content-Disposition: form-data; name=\"password\"\r\n\r\nsecret\r\n\
        --form-boundary--\r\n";

    let response = api
        .api_client
        .post(format!("{}/login", &api.api_address))
        .header(
            reqwest::header::CONTENT_TYPE,
            "multipart/form-data; boundary=form-boundary",
        )
        .body(body)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/internal");
    let session = set_cookie_pair(&response).expect("Login didn't set a cookie");
    let page = api.get("/internal", Some(&session)).await.text().await.unwrap();
    assert_that!(page, contains_substring("<small>User: alice</small>"));
    api.stop().await;
}
