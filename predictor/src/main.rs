use std::{io, sync::Arc};

use artifacts::ArtifactStore;
use log::{error, info};
use pipeline::Pipeline;
use tokio::{net::TcpListener, signal};

use predictor::{ServerConfig, router};

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env()?;
    info!(
        "loading artifacts from {} ({}, {})",
        config.artifacts_dir.display(),
        config.scaler_file,
        config.model_file
    );

    let store = ArtifactStore::open(
        &config.artifacts_dir,
        &config.scaler_file,
        &config.model_file,
    )
    .inspect_err(|e| error!("refusing to start: {e}"))?;
    let pipeline = Pipeline::new(store).inspect_err(|e| error!("refusing to start: {e}"))?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening at http://{addr}");

    axum::serve(listener, router(Arc::new(pipeline)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("wrapping up, shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("received ctrl-c"),
        Err(e) => error!("cannot listen for shutdown signal: {e}"),
    }
}
