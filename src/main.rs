//! Jen - A static site generator and prototyping server for HTML templates.

mod build;
mod cli;
mod config;
mod logger;
mod render;
mod serve;
mod site;
#[cfg(test)]
mod testing;

use anyhow::Result;
use build::render_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use logger::Printer;
use serve::{SiteHandler, serve_site};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Build { source, target } => {
            let mut printer = Printer::stdout();
            let report = render_site(source, target, config.context, &mut printer)?;
            log!(
                "build";
                "{} pages rendered, {} files copied to {}",
                report.pages.len(),
                report.copied.len(),
                target.display()
            );
            Ok(())
        }
        Commands::Server { source, .. } => {
            let handler = SiteHandler::new(source, config.context.clone())?;
            serve_site(handler, &config.serve)
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let mut config = SiteConfig::load(cli.config.as_deref())?;
    config.update_with_cli(cli);
    config.validate()?;
    Ok(config)
}
