use serde::Serialize;

use crate::domain::Name;

/// A saved request body for an operation, plus the endpoints it may be sent
/// to.
///
/// The endpoint list never contains empty strings or duplicates, and the
/// selected endpoint is always either absent or one of the listed endpoints.
/// It is only absent when there are no endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    name: Name,
    content: String,
    endpoints: Vec<String>,
    #[serde(rename = "selectedEndpoint")]
    selected: Option<String>,
}

impl Request {
    /// Construct a new [`Request`] with the given body and no endpoints.
    #[must_use]
    pub const fn new(name: Name, content: String) -> Self {
        Self {
            name,
            content,
            endpoints: Vec::new(),
            selected: None,
        }
    }

    /// The name of the request, unique within its operation.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The raw request body, typically XML.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Overwrite the request body.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// The endpoints this request may be sent to, in insertion order.
    #[must_use]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// The currently selected endpoint, if any.
    #[must_use]
    pub fn selected_endpoint(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Add an endpoint.
    ///
    /// Empty strings and endpoints that are already present are ignored. The
    /// first endpoint added becomes the selected one.
    ///
    /// Returns `true` if the endpoint was added.
    pub fn add_endpoint(&mut self, endpoint: &str) -> bool {
        if endpoint.is_empty() || self.endpoints.iter().any(|e| e == endpoint) {
            return false;
        }

        self.endpoints.push(endpoint.to_string());
        if self.selected.is_none() {
            self.selected = Some(endpoint.to_string());
        }
        true
    }

    /// Remove an endpoint.
    ///
    /// If the removed endpoint was selected, the selection moves to the first
    /// remaining endpoint, or is cleared if none remain.
    ///
    /// Returns `true` if the endpoint was present.
    pub fn remove_endpoint(&mut self, endpoint: &str) -> bool {
        let Some(pos) = self.endpoints.iter().position(|e| e == endpoint) else {
            return false;
        };

        self.endpoints.remove(pos);
        if self.selected.as_deref() == Some(endpoint) {
            self.selected = self.endpoints.first().cloned();
        }
        true
    }

    /// Select an endpoint.
    ///
    /// Only members of the endpoint list can be selected. Anything else falls
    /// back to the first endpoint, or to no selection if the list is empty.
    pub fn set_selected_endpoint(&mut self, endpoint: &str) {
        self.selected = if self.endpoints.iter().any(|e| e == endpoint) {
            Some(endpoint.to_string())
        } else {
            self.endpoints.first().cloned()
        };
    }
}
