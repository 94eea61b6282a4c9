//! Blocking HTTP client for the decrypt service.
//!
//! One call is one `POST {"data": "<token>"}` with the bearer credential in
//! the `Authorization` header. The response body is the plaintext, taken
//! verbatim. There are no retries and no caching.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, warn};

use super::credentials::CredentialSource;
use super::Resolver;
use crate::error::ResolveError;

/// Default decrypt endpoint inside the cluster.
pub const DEFAULT_ENDPOINT: &str = "http://hamuste.team-dev-ops.svc.cluster.local/api/v1/decrypt";

/// Highest status code still treated as success.
const LAST_SUCCESS_STATUS: u16 = 299;

#[derive(Debug, Serialize)]
struct DecryptRequest<'a> {
    data: &'a str,
}

pub struct HttpResolver<C> {
    client: Client,
    endpoint: String,
    credentials: C,
}

impl<C: CredentialSource> HttpResolver<C> {
    /// Builds a resolver that posts to `endpoint` and asks `credentials` for a
    /// fresh bearer token on every call.
    pub fn new(endpoint: impl Into<String>, credentials: C) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ResolveError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<C: CredentialSource> Resolver for HttpResolver<C> {
    fn resolve(&self, token: &str) -> Result<String, ResolveError> {
        // Credential first: a missing token file must abort before any network use.
        let credential = self.credentials.credential()?;

        debug!(endpoint = %self.endpoint, "requesting decryption");
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(credential.as_str())
            .json(&DecryptRequest { data: token })
            .send()
            .map_err(|e| ResolveError::Transport(format!("{e}")))?;
        drop(credential);

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ResolveError::Transport(format!("unreadable response body: {e}")))?;

        if status > LAST_SUCCESS_STATUS {
            warn!(status, "decrypt service did not indicate success");
            return Err(ResolveError::Rejected { status, body });
        }

        Ok(body)
    }
}
