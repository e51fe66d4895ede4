use soapsender::{Directory, Name, Workbench};
use tracing::instrument;

use super::{catalog::ListedOperations, parse_name, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The name of the new project
    #[clap(value_parser = parse_name)]
    name: Name,

    /// The WSDL URL of the service
    #[arg(long)]
    wsdl: String,

    /// The name of the service
    #[arg(long, default_value = "")]
    service: String,

    /// Operations offered by the service (repeatable, or comma-separated)
    #[arg(long = "operation", short, value_delimiter = ',', value_name = "OPERATION")]
    operations: Vec<String>,
}

impl Command {
    #[instrument(skip(directory))]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        if directory.contains(&self.name) {
            anyhow::bail!("Project {} already exists", self.name);
        }

        let catalog = ListedOperations::new(self.service, self.operations);
        let workbench = Workbench::new(catalog, directory.config().clone());

        let project = workbench.create_project(self.name, &self.wsdl)?;
        directory.save(&project)?;

        println!(
            "{}",
            format!(
                "✅ Created project {} with {} operation(s)",
                project.name(),
                project.operations().len()
            )
            .success()
        );
        Ok(())
    }
}
