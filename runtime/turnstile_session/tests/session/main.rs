use assertions::is_expiring_cookie;
use googletest::{
    assert_that,
    prelude::{contains_substring, not, starts_with},
};
use helpers::{manager, manager_with_keys, processor, render, request_cookies, set_cookie_header};
use securecookie::{CookieKeys, SecureCookie};
use turnstile_session::{Credentials, Identity, SessionCookieConfig, SessionManager, Username};

mod assertions;
mod helpers;

static_assertions::assert_impl_all!(SessionManager: Send, Sync, Clone);

fn alice() -> Username {
    Username::parse("alice").unwrap()
}

/// Turn a directive into the `Cookie` header a browser would send back.
fn echo(manager: &SessionManager, username: &Username) -> String {
    let directive = manager.establish(username).unwrap();
    let cookie = directive.into_cookie();
    format!("{}={}", cookie.name(), cookie.value())
}

#[test]
fn an_established_session_can_be_read_back() {
    let manager = manager();
    let header = echo(&manager, &alice());

    let processor = processor();
    let cookies = request_cookies(&header, &processor);
    assert_eq!(manager.identity_of(&cookies), Identity::Authenticated(alice()));
}

#[test]
fn round_trip_holds_for_unusual_usernames() {
    let manager = manager();
    let processor = processor();
    for raw in ["bob", "a b", "ünïcödé", "<script>", "x".repeat(512).as_str(), "a=b; c"] {
        let username = Username::parse(raw).unwrap();
        let header = echo(&manager, &username);
        let cookies = request_cookies(&header, &processor);
        assert_eq!(manager.identity_of(&cookies), Identity::Authenticated(username));
    }
}

#[test]
fn the_session_cookie_is_scoped_to_the_whole_site_without_max_age() {
    let directive = manager().establish(&alice()).unwrap();
    assert!(!directive.is_clear());

    let header = set_cookie_header(directive);
    assert_that!(header, starts_with("session="));
    assert_that!(header, contains_substring("Path=/"));
    assert_that!(header, not(contains_substring("Max-Age")));
    assert_that!(header, not(contains_substring("Expires")));
}

#[test]
fn clearing_produces_an_expiring_cookie() {
    let manager = manager();
    let directive = manager.clear();
    assert!(directive.is_clear());
    let cookie = directive.into_cookie();
    assert_that!(cookie, is_expiring_cookie());

    let header = set_cookie_header(manager.clear());
    assert_that!(header, starts_with("session=;"));
    assert_that!(header, contains_substring("Path=/"));
    assert_that!(header, contains_substring("Max-Age=-1"));
}

#[test]
fn clearing_is_idempotent() {
    let manager = manager();
    let first = render(manager.clear().into_cookie());
    let second = render(manager.clear().into_cookie());
    assert_eq!(first, second);
}

#[test]
fn no_cookie_means_anonymous() {
    let manager = manager();
    let processor = processor();

    let cookies = request_cookies("", &processor);
    assert_eq!(manager.identity_of(&cookies), Identity::Anonymous);

    let cookies = request_cookies("theme=dark; lang=en", &processor);
    assert_eq!(manager.identity_of(&cookies), Identity::Anonymous);
}

#[test]
fn garbage_cookies_mean_anonymous() {
    let manager = manager();
    let processor = processor();
    for header in ["session=", "session=garbage", "session=YWxpY2U", "session=MTIzfHh8eQ"] {
        let cookies = request_cookies(header, &processor);
        assert_eq!(manager.identity_of(&cookies), Identity::Anonymous);
    }
}

#[test]
fn tampered_tokens_never_authenticate_anyone() {
    let manager = manager();
    let directive = manager.establish(&alice()).unwrap();
    let token = directive.cookie().value().to_owned();

    for i in 0..token.len() {
        for mask in [0x01u8, 0x20, 0x80] {
            let mut tampered = token.clone().into_bytes();
            tampered[i] ^= mask;
            let tampered = String::from_utf8_lossy(&tampered);
            assert_eq!(manager.identity_from_token(&tampered), Identity::Anonymous);
        }
    }
}

#[test]
fn tokens_only_decode_under_the_name_they_were_minted_for() {
    let keys = || CookieKeys::new(vec![42; 64], Some(vec![7; 32])).unwrap();
    let session = SessionManager::new(
        SecureCookie::new(&keys()).unwrap(),
        SessionCookieConfig::default(),
    );
    let mut other_config = SessionCookieConfig::default();
    other_config.name = "preferences".into();
    let preferences = SessionManager::new(SecureCookie::new(&keys()).unwrap(), other_config);

    let token = session.establish(&alice()).unwrap().into_cookie().value().to_owned();
    assert_eq!(session.identity_from_token(&token), Identity::Authenticated(alice()));
    assert_eq!(preferences.identity_from_token(&token), Identity::Anonymous);
}

#[test]
fn tokens_minted_with_other_keys_are_ignored() {
    let ours = manager();
    let theirs = manager_with_keys(vec![1; 64], vec![7; 32]);
    let header = echo(&theirs, &alice());

    let processor = processor();
    let cookies = request_cookies(&header, &processor);
    assert_eq!(ours.identity_of(&cookies), Identity::Anonymous);
}

#[test]
fn cookie_attributes_follow_the_configuration() {
    let mut config = SessionCookieConfig::default();
    config.secure = true;
    config.http_only = true;
    config.path = Some("/app".into());
    let codec = SecureCookie::new(&CookieKeys::generate()).unwrap();
    let manager = SessionManager::new(codec, config);

    for header in [
        set_cookie_header(manager.establish(&alice()).unwrap()),
        set_cookie_header(manager.clear()),
    ] {
        assert_that!(header, contains_substring("Secure"));
        assert_that!(header, contains_substring("HttpOnly"));
        assert_that!(header, contains_substring("Path=/app"));
    }
}

#[test]
fn empty_credentials_never_reach_the_session_manager() {
    assert_eq!(Credentials::new("", "secret").authenticate(), None);
    assert_eq!(Credentials::new("alice", "").authenticate(), None);
    assert_eq!(Credentials::new("alice", "x").authenticate(), Some(alice()));
}
