// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use log::info;
use odr_watchdog::{SupervisorClient, WatchdogConfig, WatchdogLoop};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WatchdogConfig::from_env().context("invalid environment override")?;
    simple_logger::SimpleLogger::new()
        .with_level(config.log_level)
        .with_utc_timestamps()
        .init()?;
    info!(
        "odr-encoder-watchdog starting (version {})",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "poll interval {}s, restart cooldown {}s, parallel recovery {}",
        config.poll_interval.as_secs(),
        config.restart.cooldown.as_secs(),
        config.parallel_recovery
    );

    let client = SupervisorClient::new(&config.supervisor_url, config.rpc_timeout)?;
    let watchdog = WatchdogLoop::new(Arc::new(client), &config);

    let mut sigterm = signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    watchdog
        .run_until(async {
            tokio::select! {
                _ = sigterm.recv() => info!("received SIGTERM"),
                _ = sigint.recv() => info!("received SIGINT"),
            }
        })
        .await;

    info!("odr-encoder-watchdog shutting down");
    Ok(())
}
