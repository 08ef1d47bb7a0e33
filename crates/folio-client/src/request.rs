//! Request descriptors and responses flowing through the client pipeline.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Everything needed to (re)send one API call.
///
/// The pipeline never mutates a descriptor: outgoing credentials are derived
/// from it on every attempt, so a replay after a refresh picks up the fresh
/// token instead of the one that just failed.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base URL. May carry a query string.
    pub path: String,
    /// Extra query parameters.
    pub query: Vec<(String, String)>,
    /// Caller-supplied headers. An explicit `Authorization` here wins over the
    /// stored access token.
    pub headers: HeaderMap,
    /// JSON body.
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append a query parameter.
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Path with any query string removed.
    pub fn path_only(&self) -> &str {
        self.path.split(['?', '#']).next().unwrap_or_default()
    }

    /// Whether the caller already supplied an `Authorization` header.
    pub fn has_authorization(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Paths containing a dot are treated as static assets.
    pub fn is_static_asset(&self) -> bool {
        self.path_only().contains('.')
    }
}

/// A descriptor together with how many times it has been sent.
///
/// `attempt` starts at zero. Once a session refresh has been tried on behalf
/// of this request it is bumped, and a bumped attempt never refreshes again.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub descriptor: RequestDescriptor,
    pub attempt: u32,
}

impl Attempt {
    pub fn first(descriptor: RequestDescriptor) -> Self {
        Self {
            descriptor,
            attempt: 0,
        }
    }

    /// True once the request has been replayed after a refresh.
    pub fn is_retry(&self) -> bool {
        self.attempt > 0
    }

    /// The same descriptor, marked as replayed.
    pub fn into_retry(self) -> Self {
        Self {
            descriptor: self.descriptor,
            attempt: self.attempt + 1,
        }
    }
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body: &[u8] = if self.body.is_empty() {
            b"null"
        } else {
            &self.body
        };
        Ok(serde_json::from_slice(body)?)
    }

    /// Convert a failed response into the matching [`Error`].
    pub fn into_error(self) -> Error {
        Error::from_response(self.status, &self.body)
    }
}
