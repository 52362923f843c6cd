/**
 * Audio Diary Server Entry Point
 *
 * Loads configuration, opens the configured backends and serves the API,
 * the WebSocket endpoint and the static front-end.
 */

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use audiodiary::backend::server::{create_app, load_config};
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = load_config()?;
    tracing::info!(
        store = config.store.name(),
        blobs = config.blobs.name(),
        realtime = config.realtime,
        "Configuration loaded"
    );

    let port = config.port;
    let app = create_app(config).await?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "server"))]
fn main() {
    eprintln!("Server requires the 'server' feature to be enabled.");
    eprintln!("Run with: cargo run --bin audiodiary-server --features server");
    std::process::exit(1);
}
