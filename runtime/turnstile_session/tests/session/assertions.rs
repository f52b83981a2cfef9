use biscotti::ResponseCookie;
use googletest::matcher::{self, Matcher, MatcherBase};

/// Check if the cookie asks the client to delete its session.
pub fn is_expiring_cookie() -> ExpiringCookieMatcher {
    ExpiringCookieMatcher
}

#[derive(Clone, Copy, matcher::MatcherBase)]
pub struct ExpiringCookieMatcher;

impl Matcher<&ResponseCookie<'static>> for ExpiringCookieMatcher {
    fn matches(&self, actual: &ResponseCookie<'static>) -> matcher::MatcherResult {
        let expired = actual.max_age().is_some_and(|max_age| max_age.is_negative());
        (expired && actual.value().is_empty()).into()
    }

    fn describe(
        &self,
        matcher_result: matcher::MatcherResult,
    ) -> googletest::description::Description {
        match matcher_result {
            matcher::MatcherResult::Match => "is an empty cookie with a negative max age",
            matcher::MatcherResult::NoMatch => {
                "isn't an empty cookie with a negative max age"
            }
        }
        .into()
    }
}
