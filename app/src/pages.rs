//! HTML pages, rendered with `liquid` templates.
//!
//! Every value that comes from the request or the session is HTML-escaped by the templates.
use std::net::{Ipv4Addr, SocketAddr};

use http::HeaderMap;
use itertools::Itertools;
use turnstile_http::response::body::Html;
use turnstile_session::Username;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.liquid");
const INTERNAL_TEMPLATE: &str = include_str!("../templates/internal.liquid");

/// The parsed page templates.
///
/// Templates are parsed once, when the application starts.
pub struct Pages {
    index: liquid::Template,
    internal: liquid::Template,
}

impl Pages {
    /// Parse all page templates.
    pub fn parse() -> Result<Self, liquid::Error> {
        let parser = liquid::ParserBuilder::with_stdlib().build()?;
        Ok(Self {
            index: parser.parse(INDEX_TEMPLATE)?,
            internal: parser.parse(INTERNAL_TEMPLATE)?,
        })
    }

    /// The landing page, with the login form.
    pub fn index(&self, context: &PageContext<'_>) -> Result<Html, liquid::Error> {
        let globals = liquid::to_object(context)?;
        Ok(self.index.render(&globals)?.into())
    }

    /// The page reserved to authenticated users.
    pub fn internal(
        &self,
        context: &PageContext<'_>,
        user: &Username,
    ) -> Result<Html, liquid::Error> {
        let mut globals = liquid::to_object(context)?;
        globals.insert(
            "user".into(),
            liquid::model::Value::scalar(user.as_str().to_owned()),
        );
        Ok(self.internal.render(&globals)?.into())
    }
}

/// The information shown on every page.
#[derive(Debug, serde::Serialize)]
pub struct PageContext<'a> {
    color: &'a str,
    client_address: String,
    headers: Vec<HeaderLine>,
    served_from: String,
}

#[derive(Debug, serde::Serialize)]
struct HeaderLine {
    name: String,
    values: String,
}

impl<'a> PageContext<'a> {
    pub fn new(
        color: &'a str,
        client_address: SocketAddr,
        headers: &HeaderMap,
        served_from: Option<Ipv4Addr>,
    ) -> Self {
        let headers = headers
            .keys()
            .map(|name| HeaderLine {
                name: name.as_str().to_owned(),
                values: headers
                    .get_all(name)
                    .iter()
                    .map(|v| String::from_utf8_lossy(v.as_bytes()))
                    .join(", "),
            })
            .collect();
        Self {
            color,
            client_address: client_address.to_string(),
            headers,
            served_from: served_from.map(|ip| ip.to_string()).unwrap_or_default(),
        }
    }
}
