use soapsender::{Directory, Name, Workbench};
use tracing::instrument;

use super::{catalog::ListedOperations, load_project, parse_name, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The project to refresh
    #[clap(value_parser = parse_name)]
    project: Name,

    /// A new WSDL URL (defaults to the current one)
    #[arg(long)]
    wsdl: Option<String>,

    /// The name of the service (defaults to the current one)
    #[arg(long)]
    service: Option<String>,

    /// Operations now offered by the service (repeatable, or comma-separated)
    #[arg(long = "operation", short, value_delimiter = ',', value_name = "OPERATION")]
    operations: Vec<String>,
}

impl Command {
    #[instrument(skip(directory))]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        let mut project = load_project(directory, &self.project)?;

        let url = self.wsdl.unwrap_or_else(|| project.wsdl_url().to_string());
        let service = self
            .service
            .unwrap_or_else(|| project.service_name().to_string());

        let dropped: Vec<String> = project
            .operations()
            .map(|op| op.name().to_string())
            .filter(|name| !self.operations.contains(name))
            .collect();

        let catalog = ListedOperations::new(service, self.operations);
        let workbench = Workbench::new(catalog, directory.config().clone());
        workbench.refresh_project(&mut project, &url)?;
        directory.save(&project)?;

        println!(
            "{}",
            format!(
                "✅ Refreshed project {} ({} operation(s))",
                project.name(),
                project.operations().len()
            )
            .success()
        );

        if !dropped.is_empty() {
            eprintln!(
                "{}",
                format!(
                    "Operations no longer offered, kept on disk until the project is deleted: {}",
                    dropped.join(", ")
                )
                .dim()
            );
        }
        Ok(())
    }
}
