// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::control::ControlService;
use crate::error::SnapshotError;
use crate::naming::{self, ProcessCategory};
use crate::state::ProcessState;
use log::{debug, error};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An encoder process as seen in one poll. Rebuilt from scratch every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedProcess {
    pub name: String,
    pub category: ProcessCategory,
    pub state: ProcessState,
    pub last_error: Option<String>,
}

/// Point-in-time view of every ODR encoder known to the supervisor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessCensus {
    processes: BTreeMap<String, ManagedProcess>,
}

impl ProcessCensus {
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ManagedProcess> {
        self.processes.get(name)
    }

    /// State of `name`, or `Unknown` when it was not observed.
    pub fn state_of(&self, name: &str) -> ProcessState {
        self.get(name).map_or(ProcessState::Unknown, |p| p.state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManagedProcess> {
        self.processes.values()
    }

    /// Audio encoders in EXITED or FATAL, in name order.
    pub fn failed_audio_encoders(&self) -> Vec<&ManagedProcess> {
        self.iter()
            .filter(|p| p.category == ProcessCategory::AudioEncoder && p.state.is_failure())
            .collect()
    }
}

impl FromIterator<ManagedProcess> for ProcessCensus {
    fn from_iter<I: IntoIterator<Item = ManagedProcess>>(iter: I) -> Self {
        Self {
            processes: iter.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }
}

/// Reads the supervisor's process table and keeps the ODR encoders.
#[derive(Clone)]
pub struct StatusSnapshot {
    control: Arc<dyn ControlService>,
}

impl StatusSnapshot {
    pub fn new(control: Arc<dyn ControlService>) -> Self {
        Self { control }
    }

    pub async fn try_capture(&self) -> Result<ProcessCensus, SnapshotError> {
        let table = self.control.list_processes().await?;
        let total = table.len();
        let census: ProcessCensus = table
            .into_iter()
            .filter_map(|info| {
                let category = naming::classify(&info.name)?;
                Some(ManagedProcess {
                    category,
                    state: info.state(),
                    last_error: info.last_error().map(str::to_string),
                    name: info.name,
                })
            })
            .collect();
        debug!(
            "census: {} encoder(s) out of {total} supervised process(es)",
            census.len()
        );
        Ok(census)
    }

    /// Like `try_capture`, but a failed query is logged and yields an empty
    /// census. Empty means "unknown", never "all stopped".
    pub async fn capture(&self) -> ProcessCensus {
        self.try_capture().await.unwrap_or_else(|e| {
            error!("{e}");
            ProcessCensus::default()
        })
    }
}
