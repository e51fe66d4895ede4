//! Project workflows that combine the domain model with a [`ServiceCatalog`].
//!
//! A [`Workbench`] creates projects from a freshly fetched service
//! description, refreshes existing projects without losing saved requests,
//! and fills in default requests for operations that have none.

use tracing::instrument;

use crate::{
    domain::{Config, Name, Project, Request},
    service::{FetchError, RemoteOperation, ServiceCatalog, ServiceDescription},
};

/// Creates and refreshes projects from a service catalog.
#[derive(Debug)]
pub struct Workbench<C> {
    catalog: C,
    config: Config,
}

impl<C: ServiceCatalog> Workbench<C> {
    /// Create a workbench over a catalog, using `config` for defaults.
    #[must_use]
    pub const fn new(catalog: C, config: Config) -> Self {
        Self { catalog, config }
    }

    /// The catalog this workbench fetches from.
    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Create a new project from the service at `url`.
    ///
    /// The project gets one operation per fetched operation, each seeded with
    /// a default request (unless disabled in the [`Config`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the service description cannot be fetched.
    #[instrument(skip(self))]
    pub fn create_project(&self, name: Name, url: &str) -> Result<Project, FetchError> {
        let service = self.catalog.fetch_operations(url)?;

        let mut project = Project::new(name, url.to_string())
            .with_service_name(service.service_name.clone());
        project.replace_operations(operation_names(&service));
        self.seed_default_requests(&mut project, &service);

        tracing::info!(
            "Created project {} with {} operations",
            project.name(),
            project.operations().len()
        );
        Ok(project)
    }

    /// Refetch the service at `url` and merge it into `project`.
    ///
    /// Operations that are still offered keep their saved requests. New
    /// operations are added and seeded. Operations no longer offered are
    /// dropped from the project (but not from disk).
    ///
    /// # Errors
    ///
    /// Returns an error if the service description cannot be fetched. The
    /// project is left unchanged in that case.
    #[instrument(skip(self, project), fields(project = %project.name()))]
    pub fn refresh_project(&self, project: &mut Project, url: &str) -> Result<(), FetchError> {
        let service = self.catalog.fetch_operations(url)?;

        project.set_wsdl_url(url.to_string());
        project.set_service_name(service.service_name.clone());
        project.replace_operations(operation_names(&service));
        self.seed_default_requests(project, &service);

        Ok(())
    }

    /// Give every operation without requests a default request.
    ///
    /// The default request holds a generated sample body and the project's
    /// WSDL URL as its only endpoint. Does nothing if seeding is disabled.
    pub fn seed_default_requests(&self, project: &mut Project, service: &ServiceDescription) {
        if !self.config.seed_default_requests {
            return;
        }

        let request_name = match Name::try_from(self.config.default_request_name()) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Not seeding default requests: {e}");
                return;
            }
        };

        let url = project.wsdl_url().to_string();
        for operation in project.operations_mut().filter(|op| op.is_empty()) {
            let Some(remote) = service.operation(operation.name()) else {
                continue;
            };

            operation.insert_request(request_targeting(&url, remote, request_name.clone()));
        }
    }
}

/// Create a request whose body is a generated sample for `operation`.
///
/// If generation fails the body is a human readable placeholder instead.
#[must_use]
pub fn create_request(operation: &dyn RemoteOperation, name: Name) -> Request {
    Request::new(name, sample_or_placeholder(operation))
}

/// Create a request for `operation` that targets the project's WSDL URL.
///
/// This is how user-authored requests start out: a generated sample body and
/// the WSDL URL as the only endpoint (none if the URL is empty).
#[must_use]
pub fn new_request(project: &Project, operation: &dyn RemoteOperation, name: Name) -> Request {
    request_targeting(project.wsdl_url(), operation, name)
}

fn request_targeting(url: &str, operation: &dyn RemoteOperation, name: Name) -> Request {
    let mut request = create_request(operation, name);
    request.add_endpoint(url);
    request
}

/// Generate a sample body, or describe why none could be generated.
#[must_use]
pub fn sample_or_placeholder(operation: &dyn RemoteOperation) -> String {
    operation.generate_sample().unwrap_or_else(|e| {
        tracing::warn!("Failed to generate sample for {}: {e}", operation.name());
        format!("Error generating sample request: {e}")
    })
}

/// Commit an edited draft body to a request, replacing its content.
pub fn save_request_content(request: &mut Request, draft: String) {
    request.set_content(draft);
}

fn operation_names(service: &ServiceDescription) -> Vec<Name> {
    service
        .operations
        .iter()
        .filter_map(|op| match Name::try_from(op.name()) {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!("Skipping operation {:?}: {e}", op.name());
                None
            }
        })
        .collect()
}
