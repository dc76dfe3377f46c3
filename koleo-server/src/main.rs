use koleo_server::config;
use koleo_server::koleo::KoleoClient;
use koleo_server::mcp;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the MCP protocol stream.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = config::load(None);
    if !config.has_credentials() {
        tracing::info!("no credentials configured; authenticated tools will be unavailable");
    }

    let client = KoleoClient::new(&config).expect("Failed to create Koleo client");

    if let Err(e) = mcp::serve(&client, &config).await {
        eprintln!("koleo-server: stdio transport failed: {e}");
        std::process::exit(1);
    }
}
