use anyhow::Context;
use clap::Parser;
use sheetkit_log::init_logging;
use sheetkit_proc::SheetProcessor;
use sheetkit_web::{AppState, SpecServerConf, app_router};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let conf = SpecServerConf::parse();

    let _log_guard = init_logging(&conf.log_options())?;

    let processor = SheetProcessor::new(conf.process_options())?;
    let app = app_router(
        AppState::new(processor),
        &conf.static_dir,
        conf.max_upload_bytes,
    );

    let c_addr = conf.bind_addr();
    let listener = tokio::net::TcpListener::bind(&c_addr)
        .await
        .with_context(|| format!("cannot bind {c_addr}"))?;
    info!(
        addr = %listener.local_addr()?,
        static_dir = %conf.static_dir.display(),
        max_entries_per_batch = conf.max_entries_per_batch,
        "sheetkit listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sheetkit stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
