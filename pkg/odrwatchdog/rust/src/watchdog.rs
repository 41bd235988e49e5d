// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::census::StatusSnapshot;
use crate::config::WatchdogConfig;
use crate::control::ControlService;
use crate::pair::{PairOutcome, PairRecoveryPolicy};
use crate::restart::RestartController;
use log::{debug, error, info};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::sleep;

/// Result of one sampling/recovery cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Encoders present in the census.
    pub observed: usize,
    /// The process table could not be read; nothing was evaluated.
    pub snapshot_failed: bool,
    /// Failed audio encoders selected for recovery, in name order.
    pub candidates: Vec<String>,
    pub outcomes: Vec<PairOutcome>,
}

pub struct WatchdogLoop {
    snapshot: StatusSnapshot,
    policy: PairRecoveryPolicy,
    poll_interval: Duration,
    parallel_recovery: bool,
}

impl WatchdogLoop {
    pub fn new(control: Arc<dyn ControlService>, config: &WatchdogConfig) -> Self {
        let snapshot = StatusSnapshot::new(Arc::clone(&control));
        let restarts = RestartController::new(control, config.restart);
        Self {
            policy: PairRecoveryPolicy::new(snapshot.clone(), restarts),
            snapshot,
            poll_interval: config.poll_interval,
            parallel_recovery: config.parallel_recovery,
        }
    }

    /// Sample once and recover every failed audio encoder found.
    pub async fn run_cycle(&self) -> CycleReport {
        let census = match self.snapshot.try_capture().await {
            Ok(census) => census,
            Err(e) => {
                error!("{e}");
                return CycleReport {
                    snapshot_failed: true,
                    ..CycleReport::default()
                };
            }
        };

        let candidates: Vec<String> = census
            .failed_audio_encoders()
            .into_iter()
            .map(|p| p.name.clone())
            .collect();
        if candidates.is_empty() {
            debug!("all {} encoder(s) healthy", census.len());
        } else {
            info!(
                "{} failed audio encoder(s): {}",
                candidates.len(),
                candidates.join(", ")
            );
        }

        let outcomes = if self.parallel_recovery {
            self.recover_concurrently(&candidates).await
        } else {
            self.recover_sequentially(&candidates).await
        };

        CycleReport {
            observed: census.len(),
            snapshot_failed: false,
            candidates,
            outcomes,
        }
    }

    async fn recover_sequentially(&self, candidates: &[String]) -> Vec<PairOutcome> {
        let mut outcomes = Vec::with_capacity(candidates.len());
        for name in candidates {
            match self.policy.recover_pair(name).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("skipping recovery: {e}"),
            }
        }
        outcomes
    }

    /// Each pair runs as one task, so the audio-before-pad order holds within
    /// a pair while different pairs proceed independently.
    async fn recover_concurrently(&self, candidates: &[String]) -> Vec<PairOutcome> {
        let mut tasks = JoinSet::new();
        for name in candidates {
            let policy = self.policy.clone();
            let name = name.clone();
            tasks.spawn(async move { policy.recover_pair(&name).await });
        }

        let mut outcomes = Vec::with_capacity(candidates.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(outcome)) => outcomes.push(outcome),
                Ok(Err(e)) => error!("skipping recovery: {e}"),
                Err(e) => error!("recovery task failed: {e}"),
            }
        }
        outcomes.sort_by(|a, b| a.audio_name.cmp(&b.audio_name));
        outcomes
    }

    /// Run cycles every `poll_interval` until `shutdown` resolves. An
    /// in-flight recovery is abandoned at shutdown.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "watchdog running; audio encoders are checked every {}s",
            self.poll_interval.as_secs()
        );
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("watchdog stopping");
                    return;
                }
                _ = async {
                    self.run_cycle().await;
                    sleep(self.poll_interval).await;
                } => {}
            }
        }
    }
}
