use matrix_sssp::web::server::{start_server, ServerConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Environment first, then positional `[port] [static_dir]`
    let config = ServerConfig::from_env_and_args(env::args().skip(1));

    log::info!("configuration: {:?}", config);

    start_server(config).await?;

    Ok(())
}
