use soapsender::Directory;
use tracing::instrument;

use super::{RequestPath, terminal::Colorize};

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Add an endpoint to a request
    ///
    /// The first endpoint added becomes the selected one.
    Add {
        #[command(flatten)]
        path: RequestPath,

        /// The endpoint URL
        url: String,
    },

    /// Remove an endpoint from a request
    Remove {
        #[command(flatten)]
        path: RequestPath,

        /// The endpoint URL
        url: String,
    },

    /// Select the endpoint a request is sent to
    Select {
        #[command(flatten)]
        path: RequestPath,

        /// The endpoint URL; must already be one of the request's endpoints
        url: String,
    },
}

impl Command {
    #[instrument(skip(directory))]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        match self {
            Self::Add { path, url } => {
                if path.edit(directory, |request| request.add_endpoint(&url))? {
                    println!("{}", format!("✅ Added endpoint {url}").success());
                } else {
                    println!(
                        "{}",
                        format!("Endpoint '{url}' is empty or already present").dim()
                    );
                }
            }
            Self::Remove { path, url } => {
                let selected = path.edit(directory, |request| {
                    request
                        .remove_endpoint(&url)
                        .then(|| request.selected_endpoint().map(str::to_string))
                })?;
                match selected {
                    Some(selected) => {
                        println!("{}", format!("✅ Removed endpoint {url}").success());
                        let selected = selected.unwrap_or_else(|| "none".to_string());
                        println!("{}", format!("Selected endpoint: {selected}").dim());
                    }
                    None => anyhow::bail!("Endpoint {url} not found"),
                }
            }
            Self::Select { path, url } => {
                let selected = path.edit(directory, |request| {
                    request.set_selected_endpoint(&url);
                    request.selected_endpoint().map(str::to_string)
                })?;
                match selected {
                    Some(selected) if selected == url => {
                        println!("{}", format!("✅ Selected endpoint {url}").success());
                    }
                    Some(selected) => eprintln!(
                        "{}",
                        format!("⚠️  {url} is not an endpoint of this request, selected {selected}")
                            .warning()
                    ),
                    None => eprintln!(
                        "{}",
                        "⚠️  This request has no endpoints, nothing selected".warning()
                    ),
                }
            }
        }
        Ok(())
    }
}
