// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Port to the process supervisor that owns the encoders.

use crate::error::ControlError;
use crate::state::ProcessState;
use async_trait::async_trait;

/// One row of the supervisor's process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub name: String,
    pub statename: String,
    /// Last spawn error reported by the supervisor; empty when there is none.
    pub spawnerr: String,
}

impl ProcessInfo {
    pub fn state(&self) -> ProcessState {
        ProcessState::parse(&self.statename)
    }

    pub fn last_error(&self) -> Option<&str> {
        let err = self.spawnerr.trim();
        (!err.is_empty()).then_some(err)
    }
}

/// Remote start/stop/query primitives.
///
/// Implementations must be safe to call concurrently; all mutation happens on
/// the supervisor side.
#[async_trait]
pub trait ControlService: Send + Sync {
    /// Full process table.
    async fn list_processes(&self) -> Result<Vec<ProcessInfo>, ControlError>;

    /// Single process detail. Fails with `ControlError::NotFound` for an
    /// unknown name.
    async fn get_process(&self, name: &str) -> Result<ProcessInfo, ControlError>;

    /// Request a transition towards STOPPED.
    async fn stop_process(&self, name: &str) -> Result<(), ControlError>;

    /// Request a transition towards RUNNING.
    async fn start_process(&self, name: &str) -> Result<(), ControlError>;
}
