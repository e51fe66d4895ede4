//! Plain-text SOAP projects
//!
//! A project records a WSDL location, the operations it offers, and the
//! sample requests saved for each operation. Projects are stored as
//! directories of property files and raw request bodies.

pub mod domain;
pub use domain::{Config, InvalidNameError, Name, Operation, Project, Request};

/// Filesystem storage of projects.
pub mod storage;
pub use storage::{Directory, LoadAll, LoadError};

pub mod service;
pub use service::{RemoteOperation, ServiceCatalog, ServiceDescription};

pub mod workbench;
pub use workbench::Workbench;
