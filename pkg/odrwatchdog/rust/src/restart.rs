// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::RestartTimings;
use crate::control::{ControlService, ProcessInfo};
use crate::error::{ControlError, FAULT_ALREADY_STARTED};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::time::sleep;

/// How an `ensure_running` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    /// RUNNING and not forced; the process was not touched.
    AlreadyRunning,
    /// Confirmed RUNNING after `attempts` stop/start cycles.
    Restarted { attempts: u32 },
    /// The supervisor does not know the process. Re-evaluated next cycle.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Read the current state and decide what to do.
    Inspect,
    Stop,
    Start,
    /// Check whether the last start took.
    Verify,
    /// A call failed; back off before verifying.
    Cooldown,
    /// The verification query failed; back off and verify again.
    VerifyBackoff,
}

/// State of one `ensure_running` call.
#[derive(Debug)]
struct RestartAttempt<'a> {
    name: &'a str,
    force: bool,
    attempts: u32,
    /// A start request has been accepted during this call.
    started: bool,
    last_error: Option<ControlError>,
    step: Step,
}

impl<'a> RestartAttempt<'a> {
    fn new(name: &'a str, force: bool) -> Self {
        Self {
            name,
            force,
            attempts: 0,
            started: false,
            last_error: None,
            step: Step::Inspect,
        }
    }

    fn failed(&mut self, err: ControlError) -> Step {
        self.last_error = Some(err);
        Step::Cooldown
    }

    /// A forced call only succeeds once it has started the process itself.
    fn confirms(&self, info: &ProcessInfo) -> bool {
        info.state().is_running() && (self.started || !self.force)
    }

    fn missing(&self, err: &ControlError) -> RestartOutcome {
        warn!("[{}] not known to the supervisor ({err}), giving up for this cycle", self.name);
        RestartOutcome::Missing
    }
}

/// Drives a single process to RUNNING with unbounded retries.
#[derive(Clone)]
pub struct RestartController {
    control: Arc<dyn ControlService>,
    timings: RestartTimings,
    // Never pruned; keyed by encoder names, which are a small fixed set.
    locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl RestartController {
    pub fn new(control: Arc<dyn ControlService>, timings: RestartTimings) -> Self {
        Self {
            control,
            timings,
            locks: Arc::default(),
        }
    }

    fn lock_for(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(name.to_string()).or_default())
    }

    /// Drive `name` to RUNNING and return once that is confirmed.
    ///
    /// Without `force`, a RUNNING process is left alone. With `force`, the
    /// process is always stopped and started at least once. Transport and
    /// supervisor errors are retried forever; only an unknown process name
    /// ends the call early.
    ///
    /// Calls for the same name are serialized.
    pub async fn ensure_running(&self, name: &str, force: bool) -> RestartOutcome {
        let lock = self.lock_for(name);
        let _guard = lock.lock().await;

        let mut attempt = RestartAttempt::new(name, force);
        loop {
            attempt.step = match attempt.step {
                Step::Inspect => match self.control.get_process(name).await {
                    Ok(info) => {
                        let state = info.state();
                        if state.is_running() && !attempt.force {
                            info!("[{name}] is already RUNNING");
                            return RestartOutcome::AlreadyRunning;
                        }
                        attempt.attempts += 1;
                        info!(
                            "[{name}] restart attempt {} (state={state}, force={})",
                            attempt.attempts, attempt.force
                        );
                        if attempt.force || state.needs_stop_before_start() {
                            Step::Stop
                        } else {
                            Step::Start
                        }
                    }
                    Err(e) if e.is_not_found() => return attempt.missing(&e),
                    Err(e) => attempt.failed(e),
                },
                Step::Stop => {
                    // The process may already be down or mid-transition; the
                    // start that follows decides.
                    if let Err(e) = self.control.stop_process(name).await {
                        debug!("[{name}] stop request ignored: {e}");
                    }
                    sleep(self.timings.stop_settle).await;
                    Step::Start
                }
                Step::Start => match self.control.start_process(name).await {
                    Ok(()) => {
                        attempt.started = true;
                        sleep(self.timings.start_settle).await;
                        Step::Verify
                    }
                    // Something else started it between our stop and start. A
                    // forced call treats this as a failed stop and goes again.
                    Err(e) if e.is_fault(FAULT_ALREADY_STARTED) && !attempt.force => {
                        debug!("[{name}] start request raced: {e}");
                        Step::Verify
                    }
                    Err(e) if e.is_not_found() => return attempt.missing(&e),
                    Err(e) => attempt.failed(e),
                },
                Step::Cooldown => {
                    let reason = attempt
                        .last_error
                        .as_ref()
                        .map_or_else(String::new, ToString::to_string);
                    error!(
                        "[{name}] restart attempt {} failed: {reason}; retrying in {}s",
                        attempt.attempts,
                        self.timings.cooldown.as_secs()
                    );
                    sleep(self.timings.cooldown).await;
                    if attempt.force && !attempt.started {
                        Step::Inspect
                    } else {
                        Step::Verify
                    }
                }
                Step::Verify => match self.control.get_process(name).await {
                    Ok(info) if attempt.confirms(&info) => {
                        info!("[{name}] is now RUNNING");
                        return RestartOutcome::Restarted {
                            attempts: attempt.attempts,
                        };
                    }
                    Ok(info) => {
                        match info.last_error() {
                            Some(spawnerr) => warn!(
                                "[{name}] still {} after attempt {}: {spawnerr}",
                                info.state(),
                                attempt.attempts
                            ),
                            None => warn!(
                                "[{name}] still {} after attempt {}",
                                info.state(),
                                attempt.attempts
                            ),
                        }
                        Step::Inspect
                    }
                    Err(e) if e.is_not_found() => return attempt.missing(&e),
                    Err(e) => {
                        warn!(
                            "[{name}] unable to verify state: {e}; checking again in {}s",
                            self.timings.verify_retry.as_secs()
                        );
                        Step::VerifyBackoff
                    }
                },
                Step::VerifyBackoff => {
                    sleep(self.timings.verify_retry).await;
                    Step::Verify
                }
            };
        }
    }
}
