//! Document-store transport.
//!
//! [`DocumentStore`] is the seam between the seed runner and the network.
//! [`RestStore`] talks to the Firestore REST API with blocking requests, one
//! at a time, no retries.

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::error::{DocseedError, Result};
use crate::wire::{Document, EncodedFields, WriteRequest};

/// Request timeout applied to every call made by [`RestStore`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can persist one document.
pub trait DocumentStore {
    /// Write `fields` into `collection`.
    ///
    /// With no `document_id` the store assigns one (create). With an id the
    /// document is created or overwritten.
    fn write(
        &self,
        collection: &str,
        document_id: Option<&str>,
        fields: &EncodedFields,
    ) -> Result<Document>;
}

/// HTTP method and URL a write would use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTarget {
    pub method: &'static str,
    pub url: String,
}

/// `POST` to the collection when the id is server-assigned, `PATCH` to the
/// document otherwise.
pub fn write_target(
    config: &StoreConfig,
    collection: &str,
    document_id: Option<&str>,
) -> Result<WriteTarget> {
    Ok(match document_id {
        Some(id) => WriteTarget {
            method: "PATCH",
            url: config.document_url(collection, id)?,
        },
        None => WriteTarget {
            method: "POST",
            url: config.collection_url(collection)?,
        },
    })
}

/// Blocking Firestore REST client.
pub struct RestStore {
    config: StoreConfig,
    agent: ureq::Agent,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(config: StoreConfig, timeout: Duration) -> Result<Self> {
        config.validate()?;
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(Self { config, agent })
    }
}

impl DocumentStore for RestStore {
    fn write(
        &self,
        collection: &str,
        document_id: Option<&str>,
        fields: &EncodedFields,
    ) -> Result<Document> {
        let target = write_target(&self.config, collection, document_id)?;
        debug!(
            method = target.method,
            collection,
            fields = fields.len(),
            "sending write"
        );
        for (name, value) in fields {
            trace!(field = %name, kind = value.kind(), "write field");
        }

        let body = WriteRequest {
            fields: fields.clone(),
        };
        match self.agent.request(target.method, &target.url).send_json(&body) {
            Ok(response) => response
                .into_json::<Document>()
                .map_err(|e| DocseedError::Transport(format!("reading response body: {}", e))),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(DocseedError::Status { status, body })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(DocseedError::Transport(transport.to_string()))
            }
        }
    }
}
