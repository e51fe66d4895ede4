use std::collections::BTreeMap;

use serde::Serialize;

use super::operation::values;
use crate::domain::{Name, Operation};

/// A SOAP project: a WSDL location and the operations discovered from it.
///
/// The project name is also the name of its directory on disk, so it is
/// unique among stored projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    name: Name,
    wsdl_url: String,
    service_name: String,
    #[serde(serialize_with = "values")]
    operations: BTreeMap<Name, Operation>,
}

impl Project {
    /// Construct a project with no service name and no operations.
    #[must_use]
    pub const fn new(name: Name, wsdl_url: String) -> Self {
        Self {
            name,
            wsdl_url,
            service_name: String::new(),
            operations: BTreeMap::new(),
        }
    }

    /// Set the service name, builder style.
    #[must_use]
    pub fn with_service_name(mut self, service_name: String) -> Self {
        self.service_name = service_name;
        self
    }

    /// The project name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The WSDL URL the operations were fetched from. May be empty.
    #[must_use]
    pub fn wsdl_url(&self) -> &str {
        &self.wsdl_url
    }

    /// Set the WSDL URL.
    pub fn set_wsdl_url(&mut self, wsdl_url: String) {
        self.wsdl_url = wsdl_url;
    }

    /// The name of the SOAP service. May be empty.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Set the service name.
    pub fn set_service_name(&mut self, service_name: String) {
        self.service_name = service_name;
    }

    /// The operations, ordered by name.
    pub fn operations(&self) -> impl ExactSizeIterator<Item = &Operation> {
        self.operations.values()
    }

    /// Mutable access to every operation, ordered by name.
    pub fn operations_mut(&mut self) -> impl ExactSizeIterator<Item = &mut Operation> {
        self.operations.values_mut()
    }

    /// Look up an operation by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Look up an operation by name for editing.
    pub fn operation_mut(&mut self, name: &str) -> Option<&mut Operation> {
        self.operations.get_mut(name)
    }

    /// Get an operation by name, inserting an empty one if it is missing.
    pub fn operation_entry(&mut self, name: Name) -> &mut Operation {
        self.operations
            .entry(name)
            .or_insert_with_key(|name| Operation::new(name.clone()))
    }

    /// Insert an operation, replacing any existing operation with the same
    /// name.
    ///
    /// Returns the replaced operation, if there was one.
    pub fn insert_operation(&mut self, operation: Operation) -> Option<Operation> {
        self.operations.insert(operation.name().clone(), operation)
    }

    /// Replace the set of operations, merging by name.
    ///
    /// Operations whose name appears in `names` keep their saved requests.
    /// New names get an empty operation. Operations not named are dropped.
    ///
    /// Dropping an operation here only affects the in-memory project. Its
    /// directory on disk is left in place until the project is deleted.
    pub fn replace_operations<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = Name>,
    {
        let mut previous = std::mem::take(&mut self.operations);

        for name in names {
            if self.operations.contains_key(&name) {
                continue;
            }
            let operation = previous
                .remove(&name)
                .unwrap_or_else(|| Operation::new(name.clone()));
            self.operations.insert(name, operation);
        }

        if !previous.is_empty() {
            tracing::debug!(
                project = %self.name,
                dropped = ?previous.keys().map(Name::as_str).collect::<Vec<_>>(),
                "operations no longer offered by the service"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Request;

    fn name(s: &str) -> Name {
        Name::try_from(s).unwrap()
    }

    fn project_with_saved_request() -> Project {
        let mut project = Project::new(name("Demo"), "http://x/ws".to_string());
        let mut request = Request::new(name("Bar"), "<bar/>".to_string());
        request.add_endpoint("http://x/ws");
        project.operation_entry(name("Foo")).insert_request(request);
        project.operation_entry(name("Baz"));
        project
    }

    #[test]
    fn replace_operations_preserves_requests_for_matching_names() {
        let mut project = project_with_saved_request();
        let before = project.operation("Foo").unwrap().clone();

        project.replace_operations([name("Foo"), name("Qux")]);

        assert_eq!(project.operation("Foo"), Some(&before));
        assert_eq!(
            project.operation("Foo").unwrap().request("Bar").unwrap().content(),
            "<bar/>"
        );
    }

    #[test]
    fn replace_operations_adds_new_and_drops_missing() {
        let mut project = project_with_saved_request();

        project.replace_operations([name("Foo"), name("Qux")]);

        let names: Vec<_> = project.operations().map(|o| o.name().as_str()).collect();
        assert_eq!(names, ["Foo", "Qux"]);
        assert!(project.operation("Qux").unwrap().is_empty());
        assert!(project.operation("Baz").is_none());
    }

    #[test]
    fn merge_is_case_sensitive() {
        let mut project = project_with_saved_request();

        project.replace_operations([name("foo")]);

        assert!(project.operation("foo").unwrap().is_empty());
        assert!(project.operation("Foo").is_none());
    }

    #[test]
    fn operation_entry_returns_existing_operation() {
        let mut project = project_with_saved_request();

        let operation = project.operation_entry(name("Foo"));

        assert!(operation.request("Bar").is_some());
        assert_eq!(project.operations().len(), 2);
    }
}
