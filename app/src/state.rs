use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::Context;
use biscotti::Processor;
use turnstile_http::request::body::BodySizeLimit;
use turnstile_session::SessionManager;

use crate::configuration::AppConfig;
use crate::pages::Pages;
use crate::routing::Router;

/// Everything a request handler needs, built once at startup.
///
/// It is cheap to clone: all the data lives behind an [`Arc`] and is never mutated.
#[derive(Clone)]
pub struct ApplicationState(Arc<Inner>);

struct Inner {
    sessions: SessionManager,
    pages: Pages,
    cookie_processor: Processor,
    body_size_limit: BodySizeLimit,
    color: String,
    served_from: Option<Ipv4Addr>,
    router: Router,
}

impl ApplicationState {
    /// Assemble the application state.
    ///
    /// `discovered_ip` is shown as "Served from" unless the configuration provides an
    /// explicit value.
    /// It fails if the session keys are invalid or a page template doesn't parse.
    pub fn new(config: &AppConfig, discovered_ip: Option<Ipv4Addr>) -> Result<Self, anyhow::Error> {
        let sessions = SessionManager::from_config(&config.session)
            .context("Failed to set up the session manager")?;
        let pages = Pages::parse().context("Failed to parse the page templates")?;
        let router = Router::new().context("Failed to build the router")?;
        Ok(Self(Arc::new(Inner {
            sessions,
            pages,
            cookie_processor: config.cookies.clone().into(),
            body_size_limit: config.request_body.body_size_limit(),
            color: config.instance.color.clone(),
            served_from: config.instance.served_from.or(discovered_ip),
            router,
        })))
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.0.sessions
    }

    pub fn pages(&self) -> &Pages {
        &self.0.pages
    }

    pub fn cookie_processor(&self) -> &Processor {
        &self.0.cookie_processor
    }

    pub fn body_size_limit(&self) -> BodySizeLimit {
        self.0.body_size_limit
    }

    /// The heading color shown on every page.
    pub fn color(&self) -> &str {
        &self.0.color
    }

    /// The address shown as "Served from" on every page.
    pub fn served_from(&self) -> Option<Ipv4Addr> {
        self.0.served_from
    }

    pub(crate) fn router(&self) -> &Router {
        &self.0.router
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::ApplicationState;
    use crate::configuration::AppConfig;

    const DISCOVERED: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 20);

    #[test]
    fn the_discovered_address_is_a_fallback() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        let state = ApplicationState::new(&config, Some(DISCOVERED)).unwrap();
        assert_eq!(state.served_from(), Some(DISCOVERED));

        let state = ApplicationState::new(&config, None).unwrap();
        assert_eq!(state.served_from(), None);
    }

    #[test]
    fn a_configured_address_overrides_the_discovered_one() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "instance": { "served_from": "10.0.0.7" } }"#).unwrap();
        let state = ApplicationState::new(&config, Some(DISCOVERED)).unwrap();
        assert_eq!(state.served_from(), Some(Ipv4Addr::new(10, 0, 0, 7)));
    }
}
