use clap::Parser;
use redpen_cli::{cli::Cli, logging, server::RedpenMcp};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.list_themes {
        println!("Available themes:");
        for (name, description) in redpen::theme::descriptions() {
            println!("  {name}: {description}");
        }
        return;
    }

    logging::init_logging(cli.verbose);

    // Validate the theme up front so a typo fails fast instead of surfacing
    // mid-review in /api/config.
    let theme = match redpen::theme::get(&cli.theme) {
        Ok(theme) => theme.name.clone(),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    info!(target = "redpen.mcp", theme = %theme, "starting redpen MCP server");

    if let Err(err) = RedpenMcp::new(theme).serve_stdio().await {
        error!(target = "redpen.mcp", error = %err, "server error");
        std::process::exit(1);
    }
}
