//! Inbound request handed to an edge function.

use bytes::Bytes;
use std::collections::HashMap;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    /// Any method without a dedicated variant (`TRACE`, extensions).
    Other(String),
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
            Method::Patch => write!(f, "PATCH"),
            Method::Head => write!(f, "HEAD"),
            Method::Options => write!(f, "OPTIONS"),
            Method::Other(name) => f.write_str(name),
        }
    }
}

impl From<&hyper::Method> for Method {
    fn from(method: &hyper::Method) -> Self {
        match *method {
            hyper::Method::GET => Method::Get,
            hyper::Method::POST => Method::Post,
            hyper::Method::PUT => Method::Put,
            hyper::Method::DELETE => Method::Delete,
            hyper::Method::PATCH => Method::Patch,
            hyper::Method::HEAD => Method::Head,
            hyper::Method::OPTIONS => Method::Options,
            ref other => Method::Other(other.as_str().to_string()),
        }
    }
}

/// Fetch-like HTTP request.
#[derive(Debug, Clone)]
pub struct EdgeRequest {
    /// HTTP method.
    pub method: Method,
    /// Path and query, e.g. `/calc?sex=M`.
    pub url: String,
    /// HTTP headers, names as received.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
}

impl EdgeRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a header, ignoring ASCII case of the name.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Path component of the URL.
    pub fn path(&self) -> &str {
        self.url.split_once('?').map_or(&self.url, |(path, _)| path)
    }

    /// Raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// Decoded form fields: query string pairs first, then an urlencoded body.
    ///
    /// Later pairs win when a name repeats, so body fields override the query.
    pub fn form(&self) -> HashMap<String, String> {
        let mut fields: HashMap<String, String> = self
            .query()
            .map(|query| url::form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let is_form_body = self
            .get_header("content-type")
            .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));
        if let (true, Some(body)) = (is_form_body, self.body.as_ref()) {
            fields.extend(url::form_urlencoded::parse(body).into_owned());
        }

        fields
    }
}

impl Default for EdgeRequest {
    fn default() -> Self {
        Self::new(Method::Get, "/")
    }
}
