use anyhow::Context;
use clap::Parser;
use digitrec::{config, model, observability, server};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Serves handwritten digit predictions from a pre-trained ONNX classifier.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// YAML configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 1. Init
    observability::init_tracing("info");
    model::loader::init_ort()?;
    let metrics = observability::install_metrics()?;

    // 2. Load Config
    let config = config::AppConfig::load(&args.config)?;

    // 3. Load the classifier; the server never starts without one
    let classifier = model::OnnxClassifier::load(&config.model.path, config.model.input_scale)
        .with_context(|| format!("loading classifier from {}", config.model.path))?;

    // 4. Create Router
    let app = server::routes::create_router(Arc::new(classifier), metrics);

    // 5. Bind & Serve
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
