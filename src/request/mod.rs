//! Inbound request abstraction
//!
//! The validator needs three things from a request: a multi-valued query
//! lookup, the declared content type, and a body that can be read more
//! than once within one validation call.

mod body;
mod reader;

pub use body::{BodyError, RequestBody};
pub use reader::{BodyEncoding, FieldValue, ResolvedField, SourceReader};

use std::io::Cursor;

use axum::http::{header, HeaderMap, HeaderValue, Request, Uri};
use bytes::Bytes;
use url::form_urlencoded;

/// Media type of JSON bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Media type of URL-encoded form bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request as seen by the validator
#[derive(Debug)]
pub struct InboundRequest {
    uri: Uri,
    headers: HeaderMap,
    body: RequestBody,
}

impl InboundRequest {
    pub fn new(uri: Uri, headers: HeaderMap, body: impl Into<RequestBody>) -> Self {
        Self {
            uri,
            headers,
            body: body.into(),
        }
    }

    /// Build from an `http::Request`, keeping its URI and headers
    pub fn from_http<B: Into<RequestBody>>(request: Request<B>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.uri, parts.headers, body)
    }

    /// A body-less request carrying only a URI
    pub fn get(uri: Uri) -> Self {
        Self::new(uri, HeaderMap::new(), RequestBody::Empty)
    }

    /// A request with a JSON body
    pub fn post_json(uri: Uri, body: impl Into<RequestBody>) -> Self {
        Self::with_content_type(uri, JSON_CONTENT_TYPE, body)
    }

    /// A request with a URL-encoded form body
    pub fn post_form(uri: Uri, body: impl Into<RequestBody>) -> Self {
        Self::with_content_type(uri, FORM_CONTENT_TYPE, body)
    }

    fn with_content_type(uri: Uri, content_type: &'static str, body: impl Into<RequestBody>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self::new(uri, headers, body)
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// All decoded query parameters, in order of appearance
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self.uri.query() {
            Some(query) => form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
            None => Vec::new(),
        }
    }

    /// All values of a query parameter, in order of appearance
    pub fn query_values(&self, name: &str) -> Vec<String> {
        self.query_pairs()
            .into_iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value)
            .collect()
    }

    /// First value of a query parameter.
    ///
    /// `None` means the key is absent; a key without a value yields
    /// `Some("")`.
    pub fn query_first(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Declared content type, verbatim
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// How the body should be decoded, judged from the content type
    pub fn body_encoding(&self) -> BodyEncoding {
        BodyEncoding::from_content_type(self.content_type())
    }

    /// The whole body, buffered on first access
    pub fn buffered_body(&mut self, limit: usize) -> Result<Bytes, BodyError> {
        self.body.buffer(limit)
    }

    /// A fresh reader over the buffered body
    pub fn body_reader(&mut self, limit: usize) -> Result<Cursor<Bytes>, BodyError> {
        self.body.reader(limit)
    }

    /// Hands back the body, buffered if the validator read it
    pub fn into_body(self) -> RequestBody {
        self.body
    }

    pub fn into_parts(self) -> (Uri, HeaderMap, RequestBody) {
        (self.uri, self.headers, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &'static str) -> Uri {
        Uri::from_static(s)
    }

    #[test]
    fn test_query_first_distinguishes_absent_and_empty() {
        let request = InboundRequest::get(uri("http://example.com/?name=&flag"));
        assert_eq!(request.query_first("name"), Some(String::new()));
        assert_eq!(request.query_first("flag"), Some(String::new()));
        assert_eq!(request.query_first("missing"), None);
    }

    #[test]
    fn test_query_first_uses_first_value() {
        let request = InboundRequest::get(uri("http://example.com/?tag=a&tag=b"));
        assert_eq!(request.query_first("tag").as_deref(), Some("a"));
        assert_eq!(request.query_values("tag"), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_query_is_percent_decoded() {
        let request = InboundRequest::get(uri("http://example.com/?q=hello%20world&p=a+b"));
        assert_eq!(request.query_first("q").as_deref(), Some("hello world"));
        assert_eq!(request.query_first("p").as_deref(), Some("a b"));
    }

    #[test]
    fn test_no_query() {
        let request = InboundRequest::get(uri("http://example.com/"));
        assert!(request.query_pairs().is_empty());
        assert_eq!(request.query_first("name"), None);
    }

    #[test]
    fn test_content_type_helpers() {
        let request = InboundRequest::post_json(uri("/"), "{}");
        assert_eq!(request.content_type(), Some(JSON_CONTENT_TYPE));
        assert_eq!(request.body_encoding(), BodyEncoding::Json);

        let request = InboundRequest::post_form(uri("/"), "a=1");
        assert_eq!(request.body_encoding(), BodyEncoding::Form);
    }

    #[test]
    fn test_from_http_keeps_parts() {
        let http = Request::builder()
            .uri("/items?id=7")
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Bytes::from_static(b"{\"a\":\"b\"}"))
            .unwrap();

        let mut request = InboundRequest::from_http(http);
        assert_eq!(request.query_first("id").as_deref(), Some("7"));
        assert_eq!(request.body_encoding(), BodyEncoding::Json);
        assert_eq!(&request.buffered_body(64).unwrap()[..], b"{\"a\":\"b\"}");
    }

    #[test]
    fn test_into_body_returns_buffered_stream() {
        let mut request = InboundRequest::new(
            uri("/"),
            HeaderMap::new(),
            RequestBody::stream(Cursor::new(b"x=1".to_vec())),
        );
        request.buffered_body(64).unwrap();

        match request.into_body() {
            RequestBody::Buffered(bytes) => assert_eq!(&bytes[..], b"x=1"),
            other => panic!("expected buffered body, got {:?}", other),
        }
    }

    #[test]
    fn test_body_reader_restarts_after_buffering() {
        use std::io::Read;

        let mut request = InboundRequest::new(
            uri("/"),
            HeaderMap::new(),
            RequestBody::stream(Cursor::new(b"name=martins".to_vec())),
        );
        request.buffered_body(64).unwrap();

        let mut text = String::new();
        request.body_reader(64).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "name=martins");
    }
}
