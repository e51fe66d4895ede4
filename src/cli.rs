use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

mod catalog;
mod create;
mod delete;
mod endpoint;
mod list;
mod refresh;
mod request;
mod show;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use soapsender::{Directory, LoadError, Name, Project};

/// Parse a project, operation or request name.
fn parse_name(s: &str) -> Result<Name, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory projects are stored in
    #[arg(short, long, default_value = "projects", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let directory = Directory::open(self.root)?;

        self.command
            .unwrap_or_else(|| Command::List(list::Command::default()))
            .run(&directory)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List stored projects (default)
    List(list::Command),

    /// Show the operations, requests and endpoints of a project
    Show(show::Command),

    /// Create a project from a service description
    Create(create::Command),

    /// Refetch a project's service description, keeping saved requests
    Refresh(refresh::Command),

    /// Delete a project and everything stored under it
    Delete(delete::Command),

    /// Add or edit saved requests
    #[command(subcommand)]
    Request(request::Command),

    /// Manage the endpoints of a saved request
    #[command(subcommand)]
    Endpoint(endpoint::Command),
}

impl Command {
    fn run(self, directory: &Directory) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(directory),
            Self::Show(command) => command.run(directory),
            Self::Create(command) => command.run(directory),
            Self::Refresh(command) => command.run(directory),
            Self::Delete(command) => command.run(directory),
            Self::Request(command) => command.run(directory),
            Self::Endpoint(command) => command.run(directory),
        }
    }
}

/// Identifies a saved request within the store.
#[derive(Debug, clap::Args)]
struct RequestPath {
    /// The project name
    #[clap(value_parser = parse_name)]
    project: Name,

    /// The operation name
    #[clap(value_parser = parse_name)]
    operation: Name,

    /// The request name
    #[clap(value_parser = parse_name)]
    request: Name,
}

impl RequestPath {
    /// Load the project, apply `edit` to the request, and save the project.
    fn edit<T>(
        &self,
        directory: &Directory,
        edit: impl FnOnce(&mut soapsender::Request) -> T,
    ) -> anyhow::Result<T> {
        let mut project = load_project(directory, &self.project)?;

        let request = project
            .operation_mut(&self.operation)
            .with_context(|| {
                format!(
                    "Operation {} not found in project {}",
                    self.operation, self.project
                )
            })?
            .request_mut(&self.request)
            .with_context(|| {
                format!(
                    "Request {} not found in {}/{}",
                    self.request, self.project, self.operation
                )
            })?;

        let result = edit(request);
        directory.save(&project)?;
        Ok(result)
    }
}

fn load_project(directory: &Directory, name: &Name) -> anyhow::Result<Project> {
    directory.load(name).map_err(|e| match e {
        LoadError::NotFound(_) => anyhow::anyhow!("Project {name} not found"),
        e => anyhow::Error::new(e).context(format!("Failed to load project {name}")),
    })
}

/// Read a request body from a file, or from stdin if no file is given.
fn read_draft(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut draft = String::new();
            io::stdin()
                .read_to_string(&mut draft)
                .context("Failed to read request body from stdin")?;
            Ok(draft)
        }
    }
}

/// Render an error and its sources on one line.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use clap::Parser;
    use soapsender::{Directory, Project};
    use tempfile::TempDir;

    use super::*;

    const WSDL: &str = "http://x/ws";

    /// Parse `args` as a `soap` invocation against `root` and run it.
    fn run(root: &Path, args: &[&str]) -> anyhow::Result<()> {
        let argv: Vec<OsString> = ["soap".into(), "--root".into(), root.as_os_str().to_owned()]
            .into_iter()
            .chain(args.iter().map(OsString::from))
            .collect();
        let cli = Cli::try_parse_from(argv)?;
        let directory = Directory::open(cli.root)?;
        cli.command
            .unwrap_or_else(|| Command::List(list::Command::default()))
            .run(&directory)
    }

    fn load(root: &Path, project: &str) -> Project {
        Directory::open(root.to_path_buf())
            .unwrap()
            .load(&project.parse().unwrap())
            .unwrap()
    }

    fn create_demo(root: &Path) {
        run(
            root,
            &["create", "Demo", "--wsdl", WSDL, "--operation", "Ping,Echo"],
        )
        .expect("create command should succeed");
    }

    fn request<'a>(project: &'a Project, operation: &str, name: &str) -> &'a soapsender::Request {
        project
            .operation(operation)
            .and_then(|op| op.request(name))
            .expect("expected saved request")
    }

    #[test]
    fn create_run_saves_project_with_default_requests() {
        let tmp = TempDir::new().unwrap();
        create_demo(tmp.path());

        let project = load(tmp.path(), "Demo");

        assert_eq!(project.wsdl_url(), WSDL);
        assert_eq!(project.operations().len(), 2);
        let default = request(&project, "Ping", "Default Request");
        assert!(default.content().contains("<Ping/>"));
        assert_eq!(default.endpoints(), [WSDL]);
        assert_eq!(default.selected_endpoint(), Some(WSDL));
    }

    #[test]
    fn create_run_refuses_existing_project() {
        let tmp = TempDir::new().unwrap();
        create_demo(tmp.path());

        let error = run(
            tmp.path(),
            &["create", "Demo", "--wsdl", "http://other/ws", "-o", "Other"],
        )
        .unwrap_err();

        assert!(error.to_string().contains("already exists"));
        let project = load(tmp.path(), "Demo");
        assert_eq!(project.wsdl_url(), WSDL);
        assert!(project.operation("Other").is_none());
    }

    #[test]
    fn request_add_starts_from_sample_and_rejects_duplicates() {
        let tmp = TempDir::new().unwrap();
        create_demo(tmp.path());

        run(tmp.path(), &["request", "add", "Demo", "Ping", "Second"]).unwrap();

        let project = load(tmp.path(), "Demo");
        let second = request(&project, "Ping", "Second");
        assert!(second.content().contains("<Ping/>"));
        assert_eq!(second.endpoints(), [WSDL]);

        let error = run(tmp.path(), &["request", "add", "Demo", "Ping", "Second"]).unwrap_err();
        assert!(error.to_string().contains("already exists"));
    }

    #[test]
    fn request_add_reads_content_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("projects");
        let draft = tmp.path().join("draft.xml");
        fs::write(&draft, "<ping>large</ping>").unwrap();
        create_demo(&root);

        run(
            &root,
            &[
                "request",
                "add",
                "Demo",
                "Ping",
                "Large",
                "--content-file",
                draft.to_str().unwrap(),
            ],
        )
        .unwrap();

        let project = load(&root, "Demo");
        let large = request(&project, "Ping", "Large");
        assert_eq!(large.content(), "<ping>large</ping>");
        assert_eq!(large.endpoints(), [WSDL]);
    }

    #[test]
    fn request_add_requires_known_operation() {
        let tmp = TempDir::new().unwrap();
        create_demo(tmp.path());

        let error = run(tmp.path(), &["request", "add", "Demo", "Missing", "R"]).unwrap_err();

        assert!(error.to_string().contains("Operation Missing not found"));
        assert!(!tmp.path().join("Demo/Missing").exists());
    }

    #[test]
    fn request_set_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("projects");
        let draft = tmp.path().join("draft.xml");
        fs::write(&draft, "<ping>edited</ping>").unwrap();
        create_demo(&root);

        run(
            &root,
            &[
                "request",
                "set",
                "Demo",
                "Ping",
                "Default Request",
                "--content-file",
                draft.to_str().unwrap(),
            ],
        )
        .unwrap();

        let project = load(&root, "Demo");
        let edited = request(&project, "Ping", "Default Request");
        assert_eq!(edited.content(), "<ping>edited</ping>");
        assert_eq!(edited.endpoints(), [WSDL]);
        assert!(
            request(&project, "Echo", "Default Request")
                .content()
                .contains("<Echo/>")
        );
    }

    #[test]
    fn editing_missing_request_fails_without_writing() {
        let tmp = TempDir::new().unwrap();
        create_demo(tmp.path());

        let error = run(
            tmp.path(),
            &["endpoint", "add", "Demo", "Ping", "Missing", "http://b"],
        )
        .unwrap_err();

        assert!(error.to_string().contains("Request Missing not found"));
        assert!(!tmp.path().join("Demo/Ping/Missing").exists());
    }

    #[test]
    fn endpoint_add_and_remove_update_selection() {
        let tmp = TempDir::new().unwrap();
        create_demo(tmp.path());
        let path = ["Demo", "Ping", "Default Request"];
        let endpoint = |action: &str, url: &str| {
            let mut args = vec!["endpoint", action];
            args.extend(path);
            args.push(url);
            run(tmp.path(), &args)
        };

        endpoint("add", "http://b").unwrap();
        let project = load(tmp.path(), "Demo");
        let saved = request(&project, "Ping", "Default Request");
        assert_eq!(saved.endpoints(), [WSDL, "http://b"]);
        assert_eq!(saved.selected_endpoint(), Some(WSDL));

        endpoint("remove", WSDL).unwrap();
        let project = load(tmp.path(), "Demo");
        let saved = request(&project, "Ping", "Default Request");
        assert_eq!(saved.endpoints(), ["http://b"]);
        assert_eq!(saved.selected_endpoint(), Some("http://b"));

        let error = endpoint("remove", WSDL).unwrap_err();
        assert!(error.to_string().contains("not found"));
    }

    #[test]
    fn endpoint_select_falls_back_to_first_endpoint() {
        let tmp = TempDir::new().unwrap();
        create_demo(tmp.path());
        let select = |url: &str| {
            run(
                tmp.path(),
                &["endpoint", "select", "Demo", "Ping", "Default Request", url],
            )
        };
        run(
            tmp.path(),
            &["endpoint", "add", "Demo", "Ping", "Default Request", "http://b"],
        )
        .unwrap();

        select("http://b").unwrap();
        let project = load(tmp.path(), "Demo");
        assert_eq!(
            request(&project, "Ping", "Default Request").selected_endpoint(),
            Some("http://b")
        );

        select("http://unknown").unwrap();
        let project = load(tmp.path(), "Demo");
        assert_eq!(
            request(&project, "Ping", "Default Request").selected_endpoint(),
            Some(WSDL)
        );
    }

    #[test]
    fn refresh_run_keeps_saved_requests() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("projects");
        let draft = tmp.path().join("draft.xml");
        fs::write(&draft, "<ping>edited</ping>").unwrap();
        create_demo(&root);
        run(
            &root,
            &[
                "request",
                "set",
                "Demo",
                "Ping",
                "Default Request",
                "--content-file",
                draft.to_str().unwrap(),
            ],
        )
        .unwrap();

        run(&root, &["refresh", "Demo", "-o", "Ping,Cancel"]).unwrap();

        let project = load(&root, "Demo");
        assert_eq!(
            request(&project, "Ping", "Default Request").content(),
            "<ping>edited</ping>"
        );
        assert!(
            request(&project, "Cancel", "Default Request")
                .content()
                .contains("<Cancel/>")
        );
        assert!(root.join("Demo/Echo/Default Request/request.xml").is_file());
    }

    #[test]
    fn delete_run_removes_project() {
        let tmp = TempDir::new().unwrap();
        create_demo(tmp.path());

        run(tmp.path(), &["delete", "Demo", "--yes"]).unwrap();

        assert!(!tmp.path().join("Demo").exists());
        run(tmp.path(), &["delete", "Demo", "--yes"]).unwrap();
    }

    #[test]
    fn read_only_commands_succeed() {
        let tmp = TempDir::new().unwrap();
        run(tmp.path(), &[]).unwrap();
        create_demo(tmp.path());

        run(tmp.path(), &["list", "--output", "json"]).unwrap();
        run(tmp.path(), &["show", "Demo", "--with-content"]).unwrap();
        assert!(run(tmp.path(), &["show", "Missing"]).is_err());
    }
}
