use std::path::{Path, PathBuf};

use anyhow::Context;
use soapsender::{Directory, workbench};
use tracing::instrument;

use super::{
    RequestPath, catalog::EnvelopeSkeleton, load_project, read_draft, terminal::Colorize,
};

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Save a new request for an operation
    ///
    /// Without a body file the request starts from a generated sample.
    Add {
        #[command(flatten)]
        path: RequestPath,

        /// Read the request body from this file
        #[arg(long, value_name = "FILE")]
        content_file: Option<PathBuf>,
    },

    /// Replace the body of a saved request
    ///
    /// The body is read from the given file, or from stdin.
    Set {
        #[command(flatten)]
        path: RequestPath,

        /// Read the request body from this file
        #[arg(long, value_name = "FILE")]
        content_file: Option<PathBuf>,
    },
}

impl Command {
    #[instrument(skip(directory))]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        match self {
            Self::Add { path, content_file } => add(directory, &path, content_file.as_deref()),
            Self::Set { path, content_file } => {
                let draft = read_draft(content_file.as_deref())?;
                path.edit(directory, |request| {
                    workbench::save_request_content(request, draft);
                })?;
                println!(
                    "{}",
                    format!(
                        "✅ Saved {}/{}/{}",
                        path.project, path.operation, path.request
                    )
                    .success()
                );
                Ok(())
            }
        }
    }
}

fn add(
    directory: &Directory,
    path: &RequestPath,
    content_file: Option<&Path>,
) -> anyhow::Result<()> {
    let mut project = load_project(directory, &path.project)?;

    let sample = EnvelopeSkeleton::new(path.operation.to_string());
    let mut request = workbench::new_request(&project, &sample, path.request.clone());
    if let Some(file) = content_file {
        workbench::save_request_content(&mut request, read_draft(Some(file))?);
    }

    let operation = project.operation_mut(&path.operation).with_context(|| {
        format!(
            "Operation {} not found in project {}",
            path.operation, path.project
        )
    })?;
    if operation.request(&path.request).is_some() {
        anyhow::bail!(
            "Request {} already exists in {}/{}",
            path.request,
            path.project,
            path.operation
        );
    }
    operation.insert_request(request);

    directory.save(&project)?;

    println!(
        "{}",
        format!(
            "✅ Added request {}/{}/{}",
            path.project, path.operation, path.request
        )
        .success()
    );
    Ok(())
}
