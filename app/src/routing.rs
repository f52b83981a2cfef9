//! Map incoming requests to their handlers.
use http::Method;
use tracing::Instrument;
use turnstile_http::Response;
use turnstile_http::connection::ConnectionInfo;
use turnstile_http::request::RequestHead;
use turnstile_http::request::body::RawIncomingBody;
use turnstile_http::router::{AllowedMethods, MethodAllowList, method_not_allowed};
use turnstile_http::telemetry::ServerRequestId;

use crate::state::ApplicationState;
use crate::{routes, telemetry};

/// Every route exposed by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    Internal,
    Login,
    Logout,
    Health,
}

impl Route {
    const ALL: [Route; 5] = [
        Route::Index,
        Route::Internal,
        Route::Login,
        Route::Logout,
        Route::Health,
    ];

    /// The path this route is served on.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Index => "/",
            Route::Internal => "/internal",
            Route::Login => "/login",
            Route::Logout => "/logout",
            Route::Health => "/health",
        }
    }

    /// The methods this route responds to.
    ///
    /// Pages answer to any method, while state-changing actions are `POST`-only.
    pub fn allowed_methods(&self) -> AllowedMethods {
        match self {
            Route::Index | Route::Internal | Route::Health => AllowedMethods::All,
            Route::Login | Route::Logout => MethodAllowList::from_iter([Method::POST]).into(),
        }
    }
}

/// A path router over [`Route`]s.
pub struct Router(matchit::Router<Route>);

impl Router {
    pub(crate) fn new() -> Result<Self, matchit::InsertError> {
        let mut router = matchit::Router::new();
        for route in Route::ALL {
            router.insert(route.path(), route)?;
        }
        Ok(Self(router))
    }

    /// Find the route registered for `path`, if any.
    pub fn at(&self, path: &str) -> Option<Route> {
        self.0.at(path).ok().map(|matched| *matched.value)
    }
}

/// The entrypoint for every incoming request.
///
/// It creates the request's root span, picks the route and hands the request over
/// to its handler.
/// Unknown paths get a `404 Not Found`; known paths with an unexpected method get a
/// `405 Method Not Allowed`.
pub async fn route_request(
    request: http::Request<RawIncomingBody>,
    connection: ConnectionInfo,
    state: ApplicationState,
) -> Response {
    let (parts, body) = request.into_parts();
    let head = RequestHead::from(parts);
    let request_id = ServerRequestId::generate();
    let route = state.router().at(head.target.path());
    let root_span = telemetry::root_span(&head, &connection, route, request_id);

    async move {
        telemetry::log_request(&head, &connection);
        let response = match route {
            None => Response::not_found(),
            Some(route) => {
                let allowed = route.allowed_methods();
                if allowed.permits(&head.method) {
                    dispatch(route, &head, body, &connection, &state).await
                } else {
                    method_not_allowed(&allowed)
                }
            }
        };
        telemetry::response_logger(response, request_id)
    }
    .instrument(root_span.into_inner())
    .await
}

async fn dispatch(
    route: Route,
    head: &RequestHead,
    body: RawIncomingBody,
    connection: &ConnectionInfo,
    state: &ApplicationState,
) -> Response {
    match route {
        Route::Index => routes::index::get(head, connection, state),
        Route::Internal => routes::internal::get(head, connection, state),
        Route::Login => routes::login::post(head, body, state).await,
        Route::Logout => routes::logout::post(state),
        Route::Health => routes::health::get(),
    }
}
