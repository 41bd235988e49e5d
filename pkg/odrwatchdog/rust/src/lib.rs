// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Watchdog that keeps ODR audio encoders and their pad encoders running
//! under supervisord.

pub mod census;
pub mod config;
pub mod control;
pub mod error;
pub mod naming;
pub mod pair;
pub mod restart;
pub mod state;
pub mod supervisor;
pub mod watchdog;
mod xmlrpc;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use census::{ManagedProcess, ProcessCensus, StatusSnapshot};
pub use config::{RestartTimings, WatchdogConfig};
pub use control::{ControlService, ProcessInfo};
pub use error::{ConfigError, ControlError, InvalidName, SnapshotError};
pub use naming::ProcessCategory;
pub use pair::{AudioAction, PairOutcome, PairRecoveryPolicy};
pub use restart::{RestartController, RestartOutcome};
pub use state::ProcessState;
pub use supervisor::SupervisorClient;
pub use watchdog::{CycleReport, WatchdogLoop};
