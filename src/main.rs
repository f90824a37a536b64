use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aha_mcp::config::Config;
use aha_mcp::mcp::{self, McpServer};

#[derive(Parser)]
#[command(name = "aha-mcp")]
#[command(about = "Aha! features, requirements, pages and releases as MCP tools")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (default)
    Mcp,
    /// Serve MCP over streamable HTTP at /mcp
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

/// Initialize tracing with output to stderr (for stdio mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "aha_mcp=info".into()),
    );

    if use_stderr {
        // stdout is the protocol channel
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    cli.config.validate()?;
    let server = McpServer::from_config(&cli.config)?;

    match cli.command {
        Some(Commands::Serve { port }) => {
            let app = mcp::http_router(server);

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!("aha-mcp listening on http://127.0.0.1:{}/mcp", port);

            axum::serve(listener, app).await?;
        }
        Some(Commands::Mcp) | None => {
            tracing::info!(domain = %cli.config.domain, "Connecting to Aha!");
            mcp::run_stdio_server(server).await?;
        }
    }

    Ok(())
}
