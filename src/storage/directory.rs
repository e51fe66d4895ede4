//! A filesystem backed store of projects
//!
//! The [`Directory`] maps [`Project`]s to a directory tree, one subtree per
//! project. See [`crate::storage::layout`] for the layout.
//!
//! Saving never removes anything. An operation or request that is dropped
//! from a project in memory keeps its directory until the whole project is
//! deleted, and is picked up again by the next [`Directory::load`].

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use nonempty::NonEmpty;
use tracing::instrument;

use crate::{
    domain::{Config, Name, Operation, Project, Request},
    storage::{
        layout::{self, project_keys},
        lifecycle,
        properties::{ParseError, Properties},
    },
};

/// A filesystem backed store of projects.
#[derive(Debug)]
pub struct Directory {
    /// The root of the directory projects are stored in.
    root: PathBuf,
    config: Config,
}

impl Directory {
    /// Opens a store at the given path, creating the directory if needed.
    ///
    /// The store configuration is read from `config.toml` in the root, if
    /// present.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory does not exist and cannot be
    /// created. The store is unusable in that case.
    #[instrument]
    pub fn open(root: PathBuf) -> Result<Self, InitError> {
        lifecycle::ensure_dir(&root).map_err(|source| InitError {
            path: root.clone(),
            source,
        })?;

        let config = Config::load_or_default(&root);

        Ok(Self { root, config })
    }

    /// The root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The store configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The directory a project is (or would be) stored in.
    #[must_use]
    pub fn path_for(&self, project: &Name) -> PathBuf {
        layout::project_dir(&self.root, project)
    }

    /// Whether a project with this name is stored.
    #[must_use]
    pub fn contains(&self, project: &Name) -> bool {
        self.path_for(project)
            .join(layout::PROJECT_PROPERTIES)
            .is_file()
    }

    /// Write a project and all its operations and requests to disk.
    ///
    /// Existing files are overwritten. Saving the same project twice produces
    /// identical files. Files belonging to operations or requests that are no
    /// longer part of the project are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error on the first directory or file that cannot be
    /// written. Files written before the failure are kept.
    #[instrument(skip(self, project), fields(project = %project.name()))]
    pub fn save(&self, project: &Project) -> Result<(), SaveError> {
        let project_dir = self.path_for(project.name());
        create_dir(&project_dir)?;

        let properties: Properties = [
            (project_keys::NAME, project.name().as_str()),
            (project_keys::WSDL_URL, project.wsdl_url()),
            (project_keys::SERVICE_NAME, project.service_name()),
        ]
        .into_iter()
        .collect();
        write_properties(
            &project_dir.join(layout::PROJECT_PROPERTIES),
            &properties,
            layout::PROJECT_HEADER,
        )?;

        for operation in project.operations() {
            let operation_dir = layout::operation_dir(&self.root, project.name(), operation.name());
            create_dir(&operation_dir)?;
            tracing::debug!(
                "Operation: {}, requests: {}",
                operation.name(),
                operation.requests().len()
            );

            for request in operation.requests() {
                save_request(&operation_dir.join(request.name().as_str()), request)?;
            }
        }

        tracing::info!(
            "Saved project {} ({} operations)",
            project.name(),
            project.operations().len()
        );
        Ok(())
    }

    /// Save several projects.
    ///
    /// # Errors
    ///
    /// Returns an error if any project cannot be saved. This method does *not*
    /// fail fast. That is, it will attempt to save all the projects before
    /// returning the error.
    pub fn save_all<'a, I>(&self, projects: I) -> Result<(), SaveAllError>
    where
        I: IntoIterator<Item = &'a Project>,
    {
        let failures: Vec<_> = projects
            .into_iter()
            .filter_map(|project| {
                self.save(project)
                    .err()
                    .map(|e| (project.name().clone(), e))
            })
            .collect();

        NonEmpty::from_vec(failures).map_or(Ok(()), |failures| {
            tracing::warn!("{} projects could not be saved", failures.len());
            Err(SaveAllError { failures })
        })
    }

    /// Load a project from disk.
    ///
    /// Operations and requests are reconstructed from subdirectory names. A
    /// request directory without a `request.xml` has empty content, and one
    /// without an `endpoints.properties` has no endpoints.
    ///
    /// # Errors
    ///
    /// - [`LoadError::NotFound`] if the project directory or its
    ///   `project.properties` is missing
    /// - [`LoadError::Io`] if any file or directory cannot be read
    /// - [`LoadError::Corrupt`] if a file cannot be parsed, or the stored name
    ///   does not match the directory name
    #[instrument(skip(self))]
    pub fn load(&self, name: &Name) -> Result<Project, LoadError> {
        let project_dir = self.path_for(name);
        let properties_path = project_dir.join(layout::PROJECT_PROPERTIES);

        let Some(properties) = read_properties(&properties_path)? else {
            return Err(LoadError::NotFound(name.clone()));
        };

        let stored_name = properties.get(project_keys::NAME).ok_or_else(|| {
            LoadError::corrupt(&properties_path, CorruptData::MissingKey(project_keys::NAME))
        })?;
        if stored_name != name.as_str() {
            return Err(LoadError::corrupt(
                &properties_path,
                CorruptData::NameMismatch {
                    expected: name.clone(),
                    found: stored_name.to_string(),
                },
            ));
        }

        let mut project = Project::new(
            name.clone(),
            properties
                .get(project_keys::WSDL_URL)
                .unwrap_or_default()
                .to_string(),
        )
        .with_service_name(
            properties
                .get(project_keys::SERVICE_NAME)
                .unwrap_or_default()
                .to_string(),
        );

        for (operation_name, operation_dir) in subdirectories(&project_dir)? {
            let mut operation = Operation::new(operation_name);
            for (request_name, request_dir) in subdirectories(&operation_dir)? {
                operation.insert_request(load_request(request_name, &request_dir)?);
            }
            project.insert_operation(operation);
        }

        tracing::debug!(
            "Loaded project {} ({} operations)",
            project.name(),
            project.operations().len()
        );
        Ok(project)
    }

    /// Recursively delete a project directory.
    ///
    /// Deleting a project that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if any file or directory in the project cannot be
    /// removed.
    #[instrument(skip(self))]
    pub fn delete(&self, name: &Name) -> Result<(), DeleteError> {
        let path = self.path_for(name);
        let removed = lifecycle::remove_tree(&path).map_err(|source| DeleteError {
            path: path.clone(),
            source,
        })?;

        if removed {
            tracing::info!("Deleted project {name}");
        } else {
            tracing::debug!("Project {name} does not exist, nothing to delete");
        }
        Ok(())
    }

    /// The names of all stored projects, sorted.
    ///
    /// Only subdirectories of the root that contain a `project.properties`
    /// file count as projects. Everything else is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be read.
    pub fn list_project_names(&self) -> io::Result<Vec<Name>> {
        Ok(lifecycle::subdirectories(&self.root)?
            .into_iter()
            .filter(|(_, path)| path.join(layout::PROJECT_PROPERTIES).is_file())
            .map(|(name, _)| name)
            .collect())
    }

    /// Load every stored project.
    ///
    /// A project that fails to load is skipped and reported in
    /// [`LoadAll::failures`]. It does not stop the rest from loading.
    ///
    /// # Errors
    ///
    /// Returns an error only if the root directory itself cannot be read.
    pub fn load_all(&self) -> io::Result<LoadAll> {
        let mut projects = Vec::new();
        let mut failures = Vec::new();

        for name in self.list_project_names()? {
            match self.load(&name) {
                Ok(project) => projects.push(project),
                Err(error) => {
                    tracing::warn!("Failed to load project {name}: {error}");
                    failures.push(LoadFailure { name, error });
                }
            }
        }

        Ok(LoadAll { projects, failures })
    }
}

/// The outcome of [`Directory::load_all`].
#[derive(Debug)]
pub struct LoadAll {
    /// The projects that loaded successfully, sorted by name.
    pub projects: Vec<Project>,
    /// The projects that could not be loaded.
    pub failures: Vec<LoadFailure>,
}

/// A project that could not be loaded as part of a batch.
#[derive(Debug)]
pub struct LoadFailure {
    /// The name of the project.
    pub name: Name,
    /// Why it failed.
    pub error: LoadError,
}

fn save_request(request_dir: &Path, request: &Request) -> Result<(), SaveError> {
    create_dir(request_dir)?;

    write_file(
        &request_dir.join(layout::REQUEST_FILE),
        request.content().as_bytes(),
    )?;

    let mut properties: Properties = request
        .endpoints()
        .iter()
        .enumerate()
        .map(|(i, endpoint)| (layout::endpoint_key(i), endpoint.as_str()))
        .collect();
    if let Some(selected) = request.selected_endpoint() {
        properties.set(layout::SELECTED_ENDPOINT_KEY, selected);
    }

    write_properties(
        &request_dir.join(layout::ENDPOINTS_FILE),
        &properties,
        layout::ENDPOINTS_HEADER,
    )?;

    tracing::debug!(
        "  Request: {}, endpoints: {}",
        request.name(),
        request.endpoints().len()
    );
    Ok(())
}

fn load_request(name: Name, request_dir: &Path) -> Result<Request, LoadError> {
    let content_path = request_dir.join(layout::REQUEST_FILE);
    let content = match read_file(&content_path)? {
        Some(bytes) => String::from_utf8(bytes)
            .map_err(|_| LoadError::corrupt(&content_path, CorruptData::NotUtf8))?,
        None => String::new(),
    };

    let mut request = Request::new(name, content);

    if let Some(properties) = read_properties(&request_dir.join(layout::ENDPOINTS_FILE))? {
        // Indices are dense from zero, the first gap ends the list.
        for index in 0.. {
            match properties.get(&layout::endpoint_key(index)) {
                Some(endpoint) => {
                    request.add_endpoint(endpoint);
                }
                None => break,
            }
        }

        if let Some(selected) = properties.get(layout::SELECTED_ENDPOINT_KEY) {
            request.set_selected_endpoint(selected);
        }
    }

    Ok(request)
}

fn subdirectories(path: &Path) -> Result<Vec<(Name, PathBuf)>, LoadError> {
    lifecycle::subdirectories(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a whole file, returning `None` if it does not exist.
fn read_file(path: &Path) -> Result<Option<Vec<u8>>, LoadError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(LoadError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_properties(path: &Path) -> Result<Option<Properties>, LoadError> {
    let Some(bytes) = read_file(path)? else {
        return Ok(None);
    };
    let text = String::from_utf8(bytes).map_err(|_| LoadError::corrupt(path, CorruptData::NotUtf8))?;
    Properties::parse(&text)
        .map(Some)
        .map_err(|e| LoadError::corrupt(path, e.into()))
}

fn create_dir(path: &Path) -> Result<(), SaveError> {
    lifecycle::ensure_dir(path).map_err(|source| SaveError {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    let write = || -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()
    };
    write().map_err(|source| SaveError {
        path: path.to_path_buf(),
        source,
    })
}

fn write_properties(path: &Path, properties: &Properties, header: &str) -> Result<(), SaveError> {
    let mut buffer = Vec::new();
    properties
        .write(&mut buffer, header)
        .map_err(|source| SaveError {
            path: path.to_path_buf(),
            source,
        })?;
    write_file(path, &buffer)
}

/// The store root could not be created.
#[derive(Debug, thiserror::Error)]
#[error("failed to create project store at {}", .path.display())]
pub struct InitError {
    path: PathBuf,
    source: io::Error,
}

/// A file or directory could not be written while saving a project.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}", .path.display())]
pub struct SaveError {
    path: PathBuf,
    source: io::Error,
}

/// A project directory could not be removed.
#[derive(Debug, thiserror::Error)]
#[error("failed to delete {}", .path.display())]
pub struct DeleteError {
    path: PathBuf,
    source: io::Error,
}

/// Errors that can occur when loading a project.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The project directory or its `project.properties` does not exist.
    #[error("project '{0}' not found")]
    NotFound(Name),

    /// A file or directory could not be read.
    #[error("failed to read {}", .path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A file was read but its contents are unusable.
    #[error("corrupt data in {}", .path.display())]
    Corrupt {
        /// The offending file.
        path: PathBuf,
        /// What is wrong with it.
        source: CorruptData,
    },
}

impl LoadError {
    fn corrupt(path: &Path, source: CorruptData) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this is a [`LoadError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Ways in which a stored file can be unusable.
#[derive(Debug, thiserror::Error)]
pub enum CorruptData {
    /// The file is not valid UTF-8.
    #[error("file is not valid UTF-8")]
    NotUtf8,

    /// A property file could not be parsed.
    #[error(transparent)]
    Properties(#[from] ParseError),

    /// A required property is missing.
    #[error("missing required property '{0}'")]
    MissingKey(&'static str),

    /// The stored project name does not match its directory.
    #[error("stored name '{found}' does not match directory '{expected}'")]
    NameMismatch {
        /// The directory name.
        expected: Name,
        /// The name stored in the file.
        found: String,
    },
}

/// Some projects could not be saved by [`Directory::save_all`].
#[derive(Debug, thiserror::Error)]
pub struct SaveAllError {
    failures: NonEmpty<(Name, SaveError)>,
}

impl SaveAllError {
    /// The projects that failed, with the reason for each.
    pub fn failures(&self) -> impl Iterator<Item = &(Name, SaveError)> {
        self.failures.iter()
    }
}

impl fmt::Display for SaveAllError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        write!(f, "failed to save projects: ")?;

        let total = self.failures.len();

        let displayed: Vec<&str> = self
            .failures
            .iter()
            .take(MAX_DISPLAY)
            .map(|(name, _e)| name.as_str())
            .collect();

        let msg = displayed.join(", ");

        if total <= MAX_DISPLAY {
            write!(f, "{msg}")
        } else {
            write!(f, "{msg}... (and {} more)", total - MAX_DISPLAY)
        }
    }
}
