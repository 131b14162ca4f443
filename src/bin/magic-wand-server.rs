// Browser UI server for the Floriday magic wand.
//
//   FLORIDAY_TOKEN=... magic-wand-server --port 8080
//   RUST_LOG=debug magic-wand-server
//
// Environment: `MAGIC_WAND_HOST`, `MAGIC_WAND_PORT`, `MAGIC_WAND_OUTPUT_DIR`,
// `MAGIC_WAND_REMOVER` and the `FLORIDAY_*` client settings.

use anyhow::Context;
use clap::Parser;
use floriday_magic_wand::web::{self, AppState};
use floriday_magic_wand::{logging, ClientConfig, RembgCommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "magic-wand-server", version, about = "Floriday Magic Wand web UI")]
struct ServerArgs {
    #[arg(long, env = "MAGIC_WAND_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "MAGIC_WAND_PORT", default_value_t = 8080)]
    port: u16,

    #[arg(long, env = "MAGIC_WAND_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info");
    let args = ServerArgs::parse();

    let client_config = ClientConfig::from_env()?;
    if client_config.token.is_empty() {
        warn!("FLORIDAY_TOKEN is not set; uploads and listings will fail");
    }
    let remover = RembgCommand::from_env();
    info!(remover = remover.program(), url = %client_config.media_url(), "Configuration loaded");

    let state = AppState::new(client_config, Arc::new(remover)).with_output_dir(args.output_dir);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Kan niet luisteren op {addr}"))?;
    info!("UI gestart op http://{addr}");

    web::serve(listener, Arc::new(state)).await?;
    info!("Server stopped");
    Ok(())
}
