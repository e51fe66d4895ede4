//! The seam to a WSDL toolkit.
//!
//! Fetching and parsing WSDL documents and generating sample request bodies
//! happen outside this crate. A toolkit plugs in by implementing
//! [`ServiceCatalog`] and [`RemoteOperation`]; nothing here depends on its
//! concrete types.

use std::fmt;

/// A source of service descriptions, usually backed by a WSDL parser.
pub trait ServiceCatalog {
    /// Fetch and parse the service description at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the document cannot be retrieved or parsed.
    fn fetch_operations(&self, url: &str) -> Result<ServiceDescription, FetchError>;
}

/// A live handle to an operation of a fetched service.
pub trait RemoteOperation: fmt::Debug {
    /// The operation name as declared by the service.
    fn name(&self) -> &str;

    /// Generate a sample request body for this operation.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] if no sample can be produced.
    fn generate_sample(&self) -> Result<String, GenerationError>;
}

/// The result of fetching a service description.
#[derive(Debug)]
pub struct ServiceDescription {
    /// The name of the service. May be empty.
    pub service_name: String,
    /// The operations of the service, in declaration order.
    pub operations: Vec<Box<dyn RemoteOperation>>,
}

impl ServiceDescription {
    /// Look up an operation handle by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&dyn RemoteOperation> {
        self.operations
            .iter()
            .find(|op| op.name() == name)
            .map(|op| &**op)
    }
}

/// The service description could not be retrieved or parsed.
#[derive(Debug, thiserror::Error)]
#[error("failed to fetch service description from {url}: {reason}")]
pub struct FetchError {
    url: String,
    reason: String,
}

impl FetchError {
    /// Creates a new fetch error.
    #[must_use]
    pub fn new(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// A sample request body could not be generated.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct GenerationError(String);

impl GenerationError {
    /// Creates a new generation error.
    #[must_use]
    pub fn new(reason: impl fmt::Display) -> Self {
        Self(reason.to_string())
    }
}
