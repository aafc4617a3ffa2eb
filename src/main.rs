use anyhow::Result;
use timeseries_noop::{bench, create_storage, init_tracing, AppConfig};
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenvy::dotenv().ok();
    init_tracing();
    info!("Starting timeseries-noop benchmark v{}...", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env()?;

    // Ctrl-C stops the writers and cuts any in-flight artificial delay short.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping writers");
            let _ = shutdown_tx.send(true);
        }
    });

    let backend = create_storage(&config.storage, Some(shutdown_rx.clone()))?;
    let report = bench::run(backend.storage, &config.bench, shutdown_rx).await?;

    info!(
        "Sent {} samples in {} batches over {:?} ({:.0} samples/s)",
        report.samples,
        report.batches,
        report.elapsed,
        report.throughput()
    );
    if let Some(meter) = backend.samples_written {
        let rates = meter.rates();
        info!(
            "Backend counted {} samples ({:.0} samples/s mean, {:.0} 1m, {:.0} 5m, {:.0} 15m)",
            meter.count(),
            meter.mean_rate(),
            rates.one_minute,
            rates.five_minute,
            rates.fifteen_minute
        );
    }

    Ok(())
}
