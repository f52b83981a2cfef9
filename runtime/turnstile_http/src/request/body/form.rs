use std::convert::Infallible;

use bytes::Bytes;

use crate::request::RequestHead;
use crate::request::body::errors::{ExtractFormError, MultipartFormError};
use crate::request::body::{BodySizeLimit, BufferedBody};

/// The encodings an HTML form can be submitted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEncoding {
    /// `application/x-www-form-urlencoded`.
    UrlEncoded,
    /// `multipart/form-data`, with the boundary that separates its parts.
    Multipart { boundary: String },
}

impl FormEncoding {
    /// Inspect the `Content-Type` header of the request.
    ///
    /// It returns `None` if the body isn't a form, including `multipart/form-data`
    /// bodies that don't declare a boundary.
    pub fn of(request_head: &RequestHead) -> Option<Self> {
        let content_type = request_head
            .headers
            .get(http::header::CONTENT_TYPE)?
            .to_str()
            .ok()?;
        let mime = content_type.parse::<mime::Mime>().ok()?;
        match (mime.type_(), mime.subtype()) {
            (mime::APPLICATION, mime::WWW_FORM_URLENCODED) => Some(Self::UrlEncoded),
            (mime::MULTIPART, mime::FORM_DATA) => {
                let boundary = mime.get_param(mime::BOUNDARY)?;
                Some(Self::Multipart {
                    boundary: boundary.as_str().to_owned(),
                })
            }
            _ => None,
        }
    }
}

/// The values submitted by an HTML form, in the order they were received.
///
/// A field may be submitted more than once: [`FormValues::first`] returns
/// the value that came first, even if it's empty.
///
/// # Example
///
/// ```rust
/// use turnstile_http::request::body::FormValues;
///
/// let form = FormValues::from_urlencoded(b"name=alice&name=bob&password=");
/// assert_eq!(form.first("name"), Some("alice"));
/// assert_eq!(form.first("password"), Some(""));
/// assert_eq!(form.first("email"), None);
/// ```
#[derive(Debug, Default, Clone)]
pub struct FormValues(Vec<(String, String)>);

impl FormValues {
    /// Parse the query string of the request.
    pub fn from_query(request_head: &RequestHead) -> Self {
        let query = request_head.target.query().unwrap_or_default();
        Self::from_urlencoded(query.as_bytes())
    }

    /// Parse an `application/x-www-form-urlencoded` payload.
    pub fn from_urlencoded(bytes: &[u8]) -> Self {
        Self(form_urlencoded::parse(bytes).into_owned().collect())
    }

    /// Buffer the body of the request, enforcing `body_size_limit`, and parse it
    /// according to `encoding`.
    ///
    /// File uploads in a multipart body are skipped: only plain fields are form values.
    pub async fn from_body<B>(
        encoding: &FormEncoding,
        request_head: &RequestHead,
        body: B,
        body_size_limit: BodySizeLimit,
    ) -> Result<Self, ExtractFormError>
    where
        B: hyper::body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let buffered = BufferedBody::extract(request_head, body, body_size_limit).await?;
        match encoding {
            FormEncoding::UrlEncoded => Ok(Self::from_urlencoded(&buffered.bytes)),
            FormEncoding::Multipart { boundary } => {
                parse_multipart(buffered.bytes, boundary.clone())
                    .await
                    .map_err(|source| MultipartFormError { source }.into())
            }
        }
    }

    /// Merge the values from the query string with those from the body, in the order
    /// a form lookup sees them.
    ///
    /// Urlencoded body values come before the query's; multipart values come after.
    pub fn combine(encoding: Option<&FormEncoding>, query: Self, body: Self) -> Self {
        let (mut first, then) = match encoding {
            Some(FormEncoding::Multipart { .. }) => (query, body),
            _ => (body, query),
        };
        first.0.extend(then.0);
        first
    }

    /// The first value submitted for `name`, if any.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

async fn parse_multipart(bytes: Bytes, boundary: String) -> Result<FormValues, multer::Error> {
    let stream = futures_util::stream::once(async move { Ok::<_, Infallible>(bytes) });
    let mut multipart = multer::Multipart::new(stream, boundary);
    let mut values = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some_and(|f| !f.is_empty()) {
            continue;
        }
        let Some(name) = field.name().filter(|n| !n.is_empty()).map(str::to_owned) else {
            continue;
        };
        values.push((name, field.text().await?));
    }
    Ok(FormValues(values))
}

#[cfg(test)]
mod tests {
    use http::header::CONTENT_TYPE;
    use http_body_util::Full;
    use ubyte::ToByteUnit;

    use super::*;

    const BOUNDARY: &str = "X-TURNSTILE-BOUNDARY";

    fn request_head(content_type: Option<&str>) -> RequestHead {
        let mut builder = http::Request::builder()
            .method(http::Method::POST)
            .uri("/login");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder.body(()).unwrap().into_parts().0.into()
    }

    fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, file_name, value) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n"
                )),
            }
            body.push_str(&format!("\r\n{value}\r\n"));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    #[test]
    fn content_types_are_classified() {
        let urlencoded = request_head(Some("application/x-www-form-urlencoded; charset=utf-8"));
        assert_eq!(FormEncoding::of(&urlencoded), Some(FormEncoding::UrlEncoded));

        let multipart = request_head(Some(&format!("multipart/form-data; boundary={BOUNDARY}")));
        assert_eq!(
            FormEncoding::of(&multipart),
            Some(FormEncoding::Multipart {
                boundary: BOUNDARY.to_owned()
            })
        );

        for content_type in [
            None,
            Some("application/json"),
            Some("multipart/form-data"),
            Some("multipart/mixed; boundary=abc"),
        ] {
            assert_eq!(
                FormEncoding::of(&request_head(content_type)),
                None,
                "{content_type:?}"
            );
        }
    }

    #[test]
    fn the_first_value_wins_even_if_empty() {
        let form = FormValues::from_urlencoded(b"name=&name=bob&password=J%C3%BCrgen+M");
        assert_eq!(form.first("name"), Some(""));
        assert_eq!(form.first("password"), Some("Jürgen M"));
        assert_eq!(form.first("missing"), None);
    }

    #[test]
    fn urlencoded_bodies_shadow_the_query_string() {
        let encoding = FormEncoding::UrlEncoded;
        let query = FormValues::from_urlencoded(b"name=mallory&password=secret");
        let body = FormValues::from_urlencoded(b"name=");
        let form = FormValues::combine(Some(&encoding), query, body);
        assert_eq!(form.first("name"), Some(""));
        assert_eq!(form.first("password"), Some("secret"));
    }

    #[test]
    fn the_query_string_shadows_multipart_bodies() {
        let encoding = FormEncoding::Multipart {
            boundary: BOUNDARY.to_owned(),
        };
        let query = FormValues::from_urlencoded(b"name=mallory");
        let body = FormValues::from_urlencoded(b"name=alice&password=secret");
        let form = FormValues::combine(Some(&encoding), query, body);
        assert_eq!(form.first("name"), Some("mallory"));
        assert_eq!(form.first("password"), Some("secret"));
    }

    #[tokio::test]
    async fn multipart_fields_are_form_values_but_files_are_not() {
        let encoding = FormEncoding::Multipart {
            boundary: BOUNDARY.to_owned(),
        };
        let body = multipart_body(&[
            ("password", Some("password.txt"), "from-a-file"),
            ("name", None, "alice"),
            ("password", None, "secret"),
        ]);
        let form = FormValues::from_body(
            &encoding,
            &request_head(None),
            Full::new(Bytes::from(body)),
            1.kibibytes().into(),
        )
        .await
        .unwrap();
        assert_eq!(form.first("name"), Some("alice"));
        assert_eq!(form.first("password"), Some("secret"));
    }

    #[tokio::test]
    async fn malformed_multipart_bodies_are_rejected() {
        let encoding = FormEncoding::Multipart {
            boundary: BOUNDARY.to_owned(),
        };
        let body = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nalice");
        let err = FormValues::from_body(
            &encoding,
            &request_head(None),
            Full::new(Bytes::from(body)),
            1.kibibytes().into(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExtractFormError::Multipart(_)), "{err:?}");
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected_before_parsing() {
        let body = "name=alice&password=secretsecretsecret";
        let err = FormValues::from_body(
            &FormEncoding::UrlEncoded,
            &request_head(None),
            Full::new(Bytes::from_static(body.as_bytes())),
            16.bytes().into(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExtractFormError::Buffer(_)), "{err:?}");
    }
}
