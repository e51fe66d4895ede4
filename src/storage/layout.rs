//! Path construction for the on-disk project layout.
//!
//! ```text
//! <root>/<project>/project.properties
//! <root>/<project>/<operation>/<request>/request.xml
//! <root>/<project>/<operation>/<request>/endpoints.properties
//! ```
//!
//! Every directory name is a [`Name`], so it is always a single path segment
//! and cannot escape the root. The files kept beside directories
//! (`project.properties` in a project, `config.toml` in the root) are reserved
//! and never valid names.

use std::path::{Path, PathBuf};

use crate::domain::Name;

/// File holding a project's name, WSDL URL and service name.
pub const PROJECT_PROPERTIES: &str = "project.properties";

/// File holding a request's raw body.
pub const REQUEST_FILE: &str = "request.xml";

/// File holding a request's endpoints and selection.
pub const ENDPOINTS_FILE: &str = "endpoints.properties";

/// Header comment written at the top of `project.properties`.
pub const PROJECT_HEADER: &str = "Project properties";

/// Header comment written at the top of `endpoints.properties`.
pub const ENDPOINTS_HEADER: &str = "Request endpoints";

/// Property keys in `project.properties`.
pub mod project_keys {
    /// The project name. Must match the directory name.
    pub const NAME: &str = "name";
    /// The WSDL URL.
    pub const WSDL_URL: &str = "wsdlUrl";
    /// The service name.
    pub const SERVICE_NAME: &str = "serviceName";
}

/// Key of the selected endpoint in `endpoints.properties`.
pub const SELECTED_ENDPOINT_KEY: &str = "selectedEndpoint";

/// Key of the endpoint at `index` in `endpoints.properties`.
#[must_use]
pub fn endpoint_key(index: usize) -> String {
    format!("endpoint.{index}")
}

/// `<root>/<project>`
#[must_use]
pub fn project_dir(root: &Path, project: &Name) -> PathBuf {
    root.join(project.as_str())
}

/// `<root>/<project>/<operation>`
#[must_use]
pub fn operation_dir(root: &Path, project: &Name, operation: &Name) -> PathBuf {
    project_dir(root, project).join(operation.as_str())
}

/// `<root>/<project>/<operation>/<request>`
#[must_use]
pub fn request_dir(root: &Path, project: &Name, operation: &Name, request: &Name) -> PathBuf {
    operation_dir(root, project, operation).join(request.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        Name::try_from(s).unwrap()
    }

    #[test]
    fn request_dir_nests_under_project_and_operation() {
        let path = request_dir(
            Path::new("projects"),
            &name("Demo"),
            &name("Ping"),
            &name("Default Request"),
        );
        assert_eq!(path, Path::new("projects/Demo/Ping/Default Request"));
    }

    #[test]
    fn endpoint_keys_are_zero_based() {
        assert_eq!(endpoint_key(0), "endpoint.0");
        assert_eq!(endpoint_key(12), "endpoint.12");
    }

    #[test]
    fn files_beside_directories_are_not_valid_names() {
        assert!(Name::try_from(PROJECT_PROPERTIES).is_err());
        assert!(Name::try_from("config.toml").is_err());
    }
}
