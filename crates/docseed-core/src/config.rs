//! Document-store connection settings.
//!
//! A `StoreConfig` is built once by the caller and handed to the transport.
//! Nothing in the crate reads project ids or credentials from module scope.

use crate::error::{DocseedError, Result};

/// Default Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Database id used when none is given.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Where and how to reach the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub project_id: String,
    pub database: String,
    /// Web API key appended as `?key=`. Empty means no key parameter.
    pub api_key: String,
    pub base_url: String,
}

impl StoreConfig {
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Points the client at another endpoint, e.g. a local emulator.
    /// Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(DocseedError::Config("project id must not be empty".into()));
        }
        if self.database.trim().is_empty() {
            return Err(DocseedError::Config("database id must not be empty".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(DocseedError::Config("base URL must not be empty".into()));
        }
        check_segment("project id", &self.project_id)?;
        check_segment("database id", &self.database)?;
        check_api_key(&self.api_key)
    }

    /// `{base_url}/projects/{project}/databases/{database}/documents`
    pub fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database
        )
    }

    /// URL for a create-with-generated-id (`POST`) in `collection`.
    pub fn collection_url(&self, collection: &str) -> Result<String> {
        check_segment("collection", collection)?;
        self.with_key(format!("{}/{}", self.documents_url(), collection))
    }

    /// URL for a create-or-overwrite (`PATCH`) of `collection/document_id`.
    pub fn document_url(&self, collection: &str, document_id: &str) -> Result<String> {
        check_segment("collection", collection)?;
        check_segment("document id", document_id)?;
        self.with_key(format!(
            "{}/{}/{}",
            self.documents_url(),
            collection,
            document_id
        ))
    }

    fn with_key(&self, url: String) -> Result<String> {
        check_api_key(&self.api_key)?;
        if self.api_key.is_empty() {
            Ok(url)
        } else {
            Ok(format!("{}?key={}", url, self.api_key))
        }
    }
}

/// Ids are pasted into the URL path unescaped, so each must be one segment
/// free of URL delimiters, `%`, whitespace, and control characters.
fn check_segment(what: &str, segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(DocseedError::Config(format!("{} must not be empty", what)));
    }
    if let Some(c) = segment
        .chars()
        .find(|&c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        return Err(DocseedError::Config(format!(
            "{} must not contain {:?}: {:?}",
            what, c, segment
        )));
    }
    Ok(())
}

/// API keys go into the query string unescaped: unreserved characters only.
fn check_api_key(key: &str) -> Result<()> {
    if key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
    {
        Ok(())
    } else {
        Err(DocseedError::Config(
            "API key may only contain letters, digits, '-', '_', '.', '~'".into(),
        ))
    }
}
