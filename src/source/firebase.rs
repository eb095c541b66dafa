//! Firebase Realtime Database source.
//!
//! Reads a collection through the database REST API:
//! `GET {database_url}/{collection}.json?auth={token}`. The store answers
//! with the full tree under that node, or `null` when it is empty.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::runtime::Handle;

use super::{RawSnapshot, SnapshotSource};

/// Errors that can occur while reading from the store.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The store rejected the credential.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Failed to parse the response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Could not reach the store.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for a response.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_connect() {
            SourceError::Connection(err.to_string())
        } else {
            SourceError::Http(err.to_string())
        }
    }
}

/// Reads the sensor collection from a Firebase Realtime Database.
///
/// Requests are async and run on the supplied tokio runtime handle; `fetch`
/// blocks the calling thread until the response arrives.
#[derive(Debug)]
pub struct FirebaseSource {
    client: Client,
    runtime: Handle,
    database_url: String,
    collection: String,
    auth: Option<String>,
    description: String,
    last_error: Option<String>,
}

impl FirebaseSource {
    /// Create a source for `collection` under `database_url`.
    ///
    /// `auth` is a database secret or ID token, passed through as the `auth`
    /// query parameter.
    pub fn new(
        runtime: Handle,
        database_url: &str,
        collection: &str,
        auth: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        // Builder only fails on TLS backend init; fall back to defaults
        let client = builder.build().unwrap_or_default();

        let database_url = database_url.trim_end_matches('/').to_string();
        let collection = collection.trim_matches('/').to_string();
        let description = format!("firebase: {}/{}", database_url, collection);

        Self {
            client,
            runtime,
            database_url,
            collection,
            auth,
            description,
            last_error: None,
        }
    }

    /// URL of the collection, without the credential.
    pub fn collection_url(&self) -> String {
        format!("{}/{}.json", self.database_url, self.collection)
    }

    /// Perform one read of the collection.
    pub async fn read(&self) -> Result<Option<RawSnapshot>, SourceError> {
        let mut request = self.client.get(self.collection_url());
        if let Some(ref auth) = self.auth {
            request = request.query(&[("auth", auth)]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(SourceError::Auth(format!("store returned {}", status)));
        }

        if !status.is_success() {
            return Err(SourceError::Http(format!("store returned {}", status)));
        }

        let body = response.text().await?;
        RawSnapshot::from_json(&body).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

impl SnapshotSource for FirebaseSource {
    fn fetch(&mut self) -> Option<RawSnapshot> {
        tracing::debug!(url = %self.collection_url(), "Reading sensor collection");

        match self.runtime.block_on(self.read()) {
            Ok(snapshot) => {
                self.last_error = None;
                if snapshot.is_none() {
                    tracing::info!("Sensor collection is empty");
                }
                snapshot
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read sensor collection");
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
