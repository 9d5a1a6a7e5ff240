use clap::{Parser, Subcommand};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hayat")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the SMS dispatch server.
    Serve,
    /// Print the OpenAPI spec as JSON.
    Openapi,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("hayat=info,tower_http=info")),
                )
                .init();

            let db_path =
                std::env::var("HAYAT_DB_PATH").unwrap_or_else(|_| ".hayat/hayat.db".to_string());
            if let Some(parent) = Path::new(&db_path).parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let port = std::env::var("HAYAT_PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(4870);
            let timeout_mins = std::env::var("HAYAT_DIALOGUE_TIMEOUT_MINS")
                .ok()
                .and_then(|value| value.parse::<i64>().ok())
                .unwrap_or(30);
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);

            let state = hayat_serve::AppState::new(
                db_path.clone(),
                hayat_serve::collaborator_from_env(),
                hayat_serve::gateway::gateway_from_env(),
                timeout_mins,
            );
            info!(%addr, db = %db_path, "starting dispatch server");
            if let Err(err) = hayat_serve::serve(state, addr).await {
                eprintln!("serve error: {err}");
            }
        }
        Command::Openapi => {
            let spec = hayat_serve::openapi::generate_spec();
            println!("{}", spec);
        }
    }
}
