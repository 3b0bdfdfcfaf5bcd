//! HTTP seam.
//!
//! The client only ever issues `GET` requests and reads the body as text, so
//! the seam is one method.  [`ReqwestTransport`] is the production
//! implementation; tests plug in an in-memory fake.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::{OsrmError, OsrmResult};

/// Status code and body of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body:   String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking `GET`.  A non-2xx status is a response, not an error; only
/// failures to obtain a response (DNS, connect, timeout, body read) are
/// errors.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str) -> OsrmResult<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn get(&self, url: &str) -> OsrmResult<HttpResponse> {
        (**self).get(url)
    }
}

/// `reqwest` blocking client with a per-request timeout.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> OsrmResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| OsrmError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> OsrmResult<HttpResponse> {
        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                OsrmError::Transport(format!("request timed out: {e}"))
            } else {
                OsrmError::Transport(e.to_string())
            }
        })?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| OsrmError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
