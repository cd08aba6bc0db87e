use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use drainer_core::{MemoryQueue, ShutdownSignal, WorkerLoop, listen_os_signals};
use drainer_observe::{init_local_offset, init_logger};
use drainer_prometheus::PrometheusMetrics;

mod cli;
mod demo;

use cli::Cli;
use demo::DemoSeed;

fn main() -> anyhow::Result<()> {
    // Local offset must be read while the process is still single-threaded.
    init_local_offset();
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // 1) logger
    init_logger(&cli.logger_config())?;

    // 2) config
    let config = cli.loop_config().context("invalid loop configuration")?;
    let jitter = cli.jitter().context("invalid jitter window")?;
    info!(queues = %config.queues, duration = %config.duration, log_std = cli.log_std, "agent starting");

    // 3) queue + demo workload
    let queue = Arc::new(MemoryQueue::new());
    let seed = DemoSeed::new(queue.clone(), cli.demo, &config.queues, cli.log_std);

    // 4) shutdown
    let shutdown = ShutdownSignal::new(jitter);
    let signals = listen_os_signals(shutdown.clone());

    // 5) metrics
    let metrics = PrometheusMetrics::new().context("failed to register metrics")?;

    // 6) worker
    let worker = WorkerLoop::new(config, queue.clone(), shutdown.clone())
        .with_bootstrap(Arc::new(seed))
        .with_idle_hook(queue.clone())
        .with_metrics(Arc::new(metrics.clone()));

    let outcome = worker.run().await;
    shutdown.request();
    reap_listener(signals).await;

    let report = outcome.inspect_err(|e| error!(error = %e, "worker loop failed"))?;
    info!(
        %report,
        executed = queue.executed(),
        failed = queue.failed(),
        pending = queue.len(),
        "agent finished"
    );

    if cli.dump_metrics {
        print!("{}", metrics.render()?);
    }
    Ok(())
}

/// Wait for the signal listener; a panic inside it is logged, not propagated.
async fn reap_listener(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "signal listener ended abnormally");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_listener_exit_is_reported() {
        let handle = tokio::spawn(async {});
        assert!(reap_listener(handle).await);
    }

    #[tokio::test]
    async fn panicking_listener_is_contained() {
        let handle = tokio::spawn(async { panic!("listener blew up") });
        assert!(!reap_listener(handle).await);
    }
}
