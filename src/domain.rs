//! Domain models for SOAP projects.
//!
//! A [`Project`] owns its [`Operation`]s, which own their saved
//! [`Request`]s. Every level is identified by a [`Name`], which is also its
//! directory name on disk.

mod config;
pub use config::Config;

mod name;
pub use name::{InvalidNameError, Name};

mod operation;
pub use operation::Operation;

mod project;
pub use project::Project;

mod request;
pub use request::Request;
