use std::io;

use clap::ValueEnum;
use soapsender::{Directory, LoadAll};
use tracing::instrument;

use super::{error_chain, terminal::Colorize};

#[derive(Debug, Default, clap::Parser)]
pub struct Command {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(directory))]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        let LoadAll { projects, failures } = directory.load_all()?;

        match self.output {
            OutputFormat::Pretty => {
                if projects.is_empty() && failures.is_empty() {
                    println!(
                        "{}",
                        format!("No projects in {}", directory.root().display()).dim()
                    );
                }
                for project in &projects {
                    let service = if project.service_name().is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", project.service_name())
                    };
                    println!(
                        "{}{service}  {} operation(s)  {}",
                        project.name().as_str().info(),
                        project.operations().len(),
                        project.wsdl_url().dim()
                    );
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(io::stdout(), &projects)?;
                println!();
            }
        }

        for failure in &failures {
            eprintln!(
                "{}",
                format!(
                    "⚠️  Could not load {}: {}",
                    failure.name,
                    error_chain(&failure.error)
                )
                .warning()
            );
        }

        Ok(())
    }
}
