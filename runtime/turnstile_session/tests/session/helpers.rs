use biscotti::{Processor, ProcessorConfig, RequestCookies, ResponseCookie, ResponseCookies};
use securecookie::{CookieKeys, SecureCookie};
use turnstile_session::{CookieDirective, SessionCookieConfig, SessionManager};

pub fn processor() -> Processor {
    ProcessorConfig::default().into()
}

/// A manager with fixed keys, so that tests are reproducible.
pub fn manager() -> SessionManager {
    manager_with_keys(vec![42; 64], vec![7; 32])
}

pub fn manager_with_keys(hash_key: Vec<u8>, block_key: Vec<u8>) -> SessionManager {
    let keys = CookieKeys::new(hash_key, Some(block_key)).unwrap();
    let codec = SecureCookie::new(&keys).unwrap();
    SessionManager::new(codec, SessionCookieConfig::default())
}

/// Render the `Set-Cookie` header value for the given directive.
pub fn set_cookie_header(directive: CookieDirective) -> String {
    render(directive.into_cookie())
}

pub fn render(cookie: ResponseCookie<'static>) -> String {
    let mut cookies = ResponseCookies::new();
    cookies.insert(cookie);
    cookies.header_values(&processor()).next().unwrap()
}

/// Parse a `Cookie` header the way a server would.
pub fn request_cookies<'h>(header: &'h str, processor: &Processor) -> RequestCookies<'h> {
    let mut cookies = RequestCookies::new();
    cookies.extend_from_header(header, processor).unwrap();
    cookies
}
