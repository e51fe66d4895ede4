use soapsender::{Directory, Name, Request};
use tracing::instrument;

use super::{
    load_project, parse_name,
    terminal::{self, Colorize},
};

const DEFAULT_WIDTH: usize = 100;
const CONTENT_INDENT: &str = "        ";

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The project to display
    #[clap(value_parser = parse_name)]
    project: Name,

    /// Include request bodies in the output
    #[arg(long)]
    with_content: bool,
}

impl Command {
    #[instrument(level = "debug", skip(directory))]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        let project = load_project(directory, &self.project)?;
        let width = terminal::terminal_width().map_or(DEFAULT_WIDTH, usize::from);

        println!("# {}", project.name());
        println!("  WSDL:     {}", project.wsdl_url());
        if !project.service_name().is_empty() {
            println!("  Service:  {}", project.service_name());
        }
        println!(
            "  Path:     {}",
            directory.path_for(project.name()).display()
        );

        if project.operations().next().is_none() {
            println!("\n{}", "No operations".dim());
            return Ok(());
        }

        println!("\n{}", "Operations".dim());
        for operation in project.operations() {
            println!("  {}", operation.name().as_str().info());
            for request in operation.requests() {
                self.print_request(request, width);
            }
        }

        Ok(())
    }

    fn print_request(&self, request: &Request, width: usize) {
        println!("    • {}", request.name());

        let selected = request.selected_endpoint();
        for endpoint in request.endpoints() {
            if Some(endpoint.as_str()) == selected {
                println!("      → {}", endpoint.success());
            } else {
                println!("        {}", endpoint.dim());
            }
        }

        if self.with_content {
            let available = width.saturating_sub(CONTENT_INDENT.len()).max(10);
            for line in request.content().lines() {
                println!("{CONTENT_INDENT}{}", terminal::truncate(line, available));
            }
        }
    }
}
