use soapsender::{Directory, Name};
use tracing::instrument;

use super::{parse_name, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The project to delete
    #[clap(value_parser = parse_name)]
    project: Name,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument(skip(directory))]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        if !directory.contains(&self.project) {
            println!(
                "{}",
                format!("Project {} does not exist, nothing to delete", self.project).dim()
            );
            return Ok(());
        }

        if !self.yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!(
                    "Delete project {} and all its saved requests?",
                    self.project
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }
        }

        directory.delete(&self.project)?;

        println!(
            "{}",
            format!("✅ Deleted project {}", self.project).success()
        );
        Ok(())
    }
}
