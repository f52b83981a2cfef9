//! Method-based dispatch helpers.
use http::header::ALLOW;
use http::{HeaderValue, Method};
use itertools::Itertools;
use smallvec::SmallVec;

use crate::Response;

/// The HTTP methods a route responds to.
#[derive(Debug, Clone)]
pub enum AllowedMethods {
    /// Only the listed methods are accepted.
    Some(MethodAllowList),
    /// Any method is accepted, including custom ones.
    All,
}

impl AllowedMethods {
    /// Returns `true` if requests using `method` should be handled.
    pub fn permits(&self, method: &Method) -> bool {
        match self {
            AllowedMethods::Some(list) => list.contains(method),
            AllowedMethods::All => true,
        }
    }

    /// The value of the `Allow` header for a `405 Method Not Allowed` response.
    ///
    /// It's `None` if every method is accepted.
    pub fn allow_header_value(&self) -> Option<HeaderValue> {
        match self {
            AllowedMethods::Some(m) => m.allow_header_value(),
            AllowedMethods::All => None,
        }
    }
}

impl From<MethodAllowList> for AllowedMethods {
    fn from(methods: MethodAllowList) -> Self {
        Self::Some(methods)
    }
}

/// A set of HTTP methods, usually the ones accepted by a route.
#[derive(Debug, Clone)]
pub struct MethodAllowList {
    // Routes rarely accept more than a handful of methods.
    methods: SmallVec<[Method; 5]>,
}

impl FromIterator<Method> for MethodAllowList {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        Self {
            methods: SmallVec::from_iter(iter),
        }
    }
}

impl MethodAllowList {
    /// Returns `true` if `method` is in the list.
    pub fn contains(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Iterate over the methods in the list.
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    /// The number of methods in the list.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// The comma-separated list of methods, ready for an `Allow` header.
    pub fn allow_header_value(&self) -> Option<HeaderValue> {
        if self.methods.is_empty() {
            return None;
        }
        let allow_header = self.methods.iter().map(Method::as_str).join(",");
        HeaderValue::from_str(&allow_header).ok()
    }
}

/// A `405 Method Not Allowed` response listing the accepted methods in the `Allow` header.
pub fn method_not_allowed(allowed: &AllowedMethods) -> Response {
    let response = Response::method_not_allowed();
    match allowed.allow_header_value() {
        Some(allow) => response.insert_header(ALLOW, allow),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use http::header::ALLOW;
    use http::{Method, StatusCode};

    use super::*;

    #[test]
    fn a_single_method_list_only_permits_that_method() {
        let allowed: AllowedMethods = MethodAllowList::from_iter([Method::POST]).into();
        assert!(allowed.permits(&Method::POST));
        assert!(!allowed.permits(&Method::GET));
        assert!(!allowed.permits(&Method::from_bytes(b"PURGE").unwrap()));
    }

    #[test]
    fn all_permits_custom_methods() {
        assert!(AllowedMethods::All.permits(&Method::from_bytes(b"PURGE").unwrap()));
        assert!(AllowedMethods::All.allow_header_value().is_none());
    }

    #[test]
    fn the_allow_header_lists_every_method() {
        let allowed: AllowedMethods =
            MethodAllowList::from_iter([Method::GET, Method::POST]).into();
        let response = method_not_allowed(&allowed);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET,POST");
    }
}
