//! Thin HTTP layer over `reqwest`.
//!
//! Requests are built against the configured API root and carry the bearer token
//! when one is set. Responses are read fully into a [`Response`] so callers can
//! classify them without holding a connection open. Transport failures become
//! [`ApiError::Network`]; non-2xx statuses go through [`ApiError::from_status`].

use log::debug;
use outposts_states::ApiError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use ustr::Ustr;

use crate::BusinessConfig;

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into the matching [`ApiError`].
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, &self.body))
        }
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::decode(e.to_string()))
    }
}

/// Shared client bound to one API root.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    api_url: Ustr,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &BusinessConfig) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;
        Ok(Self {
            inner,
            api_url: config.api_url(),
            token: config.token.clone(),
        })
    }

    pub fn api_url(&self) -> Ustr {
        self.api_url
    }

    pub fn get(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::Get, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::Post, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::Put, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::Delete, path)
    }

    /// `path` is relative to the API root, e.g. `outposts/outposts/`.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            method,
            url: format!("{}/{}", self.api_url, path.trim_start_matches('/')),
            query: Vec::new(),
            body: None,
        }
    }
}

/// A builder for one request.
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    client: &'a HttpClient,
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder<'_> {
    /// Appends a query parameter. Empty values are skipped.
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.query.push((name.to_owned(), value));
        }
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(value).map_err(|e| ApiError::decode(e.to_string()))?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Sends the request and reads the whole response, whatever its status.
    pub async fn send(self) -> Result<Response, ApiError> {
        let client = &self.client.inner;
        let mut request = match self.method {
            Method::Get => client.get(&self.url),
            Method::Post => client.post(&self.url),
            Method::Put => client.put(&self.url),
            Method::Delete => client.delete(&self.url),
        };

        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        if let Some(token) = &self.client.token {
            request = request.bearer_auth(token);
        }
        request = request.header("accept", "application/json");
        if let Some(body) = self.body {
            request = request
                .header("content-type", "application/json")
                .body(body);
        }

        debug!("{:?} {}", self.method, self.url);
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();
        debug!("{:?} {} -> {status}", self.method, self.url);

        Ok(Response { status, body })
    }

    /// Sends the request and fails on any non-2xx status.
    pub async fn send_checked(self) -> Result<Response, ApiError> {
        self.send().await?.error_for_status()
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::network("request timed out")
    } else {
        ApiError::network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Response {
        Response {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn error_for_status_classifies() {
        assert!(response(204, "").error_for_status().is_ok());
        assert_eq!(
            response(404, r#"{"detail":"Not found."}"#).error_for_status().unwrap_err(),
            ApiError::NotFound
        );
        let err = response(400, r#"{"name":["This field is required."]}"#)
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.field_errors("name"), ["This field is required."]);
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = response(200, "not json").json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn request_urls_join_api_root() {
        let client = HttpClient::new(&BusinessConfig::new("http://auth.local/")).unwrap();
        let request = client
            .get("/outposts/outposts/")
            .query("search", "")
            .query("page", 2);
        assert_eq!(request.url, "http://auth.local/api/v2beta/outposts/outposts/");
        assert_eq!(request.query, vec![("page".to_owned(), "2".to_owned())]);
    }
}
