use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Name, Request};

/// A single named SOAP method exposed by a service.
///
/// An operation is only a container for its saved requests; it has no state
/// of its own beyond its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    name: Name,
    #[serde(serialize_with = "values")]
    requests: BTreeMap<Name, Request>,
}

impl Operation {
    /// Construct an operation with no requests.
    #[must_use]
    pub const fn new(name: Name) -> Self {
        Self {
            name,
            requests: BTreeMap::new(),
        }
    }

    /// The operation name, unique within its project.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The saved requests, ordered by name.
    pub fn requests(&self) -> impl ExactSizeIterator<Item = &Request> {
        self.requests.values()
    }

    /// Whether this operation has any saved requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Look up a request by name.
    #[must_use]
    pub fn request(&self, name: &str) -> Option<&Request> {
        self.requests.get(name)
    }

    /// Look up a request by name for editing.
    pub fn request_mut(&mut self, name: &str) -> Option<&mut Request> {
        self.requests.get_mut(name)
    }

    /// Insert a request, replacing any existing request with the same name.
    ///
    /// Returns the replaced request, if there was one.
    pub fn insert_request(&mut self, request: Request) -> Option<Request> {
        self.requests.insert(request.name().clone(), request)
    }

    /// Remove a request by name.
    pub fn remove_request(&mut self, name: &str) -> Option<Request> {
        self.requests.remove(name)
    }
}

/// Serialize a name-keyed map as the sequence of its values.
pub(super) fn values<V, S>(map: &BTreeMap<Name, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: serde::Serializer,
{
    serializer.collect_seq(map.values())
}
