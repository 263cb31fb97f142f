use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use swot_builder::{constants, interview, terminal, web_server, ProviderArgs, Workflow};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the SWOT Strategy Builder web page.
    Serve {
        #[arg(long, default_value_t = constants::DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
        #[arg(long, default_value = constants::TEMPLATES_DIR.as_str(), help = "Directory holding index.html.")]
        templates_dir: PathBuf,
        #[arg(long, default_value = constants::STATIC_DIR.as_str(), help = "Directory served under /static.")]
        static_dir: PathBuf,
        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Run the interview in the terminal.
    Interview {
        #[arg(long, help = "Business domain; asked for on stdin when omitted.")]
        domain: Option<String>,
        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Print the interview template that questions are derived from.
    Template,
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g., RUST_LOG=info,swot_builder=debug), defaulting to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            templates_dir,
            static_dir,
            provider,
        } => {
            let settings = provider
                .into_settings()
                .context("Invalid provider configuration")?;
            let workflow = Workflow::from_settings(&settings);

            info!("Starting SWOT Strategy Builder on port {}...", port);
            let mut web_server_handle = tokio::spawn(web_server::start_web_server(
                port,
                workflow,
                templates_dir,
                static_dir,
            ));

            let ctrl_c = tokio::signal::ctrl_c();
            // Pin the ctrl_c future to the stack so its address is stable
            tokio::pin!(ctrl_c);

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, shutting down...");
                    web_server_handle.abort();
                }
                res = &mut web_server_handle => {
                    match res {
                        Ok(Ok(())) => info!("Web server task completed."),
                        Ok(Err(e)) => {
                            error!("Web server failed: {:?}", e);
                            return Err(e);
                        }
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }
            info!("Shutdown complete.");
        }
        Commands::Interview { domain, provider } => {
            let settings = provider
                .into_settings()
                .context("Invalid provider configuration")?;
            let workflow = Workflow::from_settings(&settings);

            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout();
            terminal::run_interview(&workflow, domain, &mut input, &mut output)
                .await
                .context("Interview failed")?;
        }
        Commands::Template => {
            print!("{}", interview::INTERVIEW_TEMPLATE);
        }
    }

    Ok(())
}
