// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! In-memory supervisor used by unit and integration tests.
//!
//! Mimics supervisord closely enough for the restart protocol: stopping a
//! process that is not running and starting one that is already running both
//! fault, and a start that does not reach RUNNING faults with
//! `ABNORMAL_TERMINATION`.

use crate::control::{ControlService, ProcessInfo};
use crate::error::ControlError;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

pub use crate::error::FAULT_ALREADY_STARTED;

pub const FAULT_ABNORMAL_TERMINATION: i64 = 40;
pub const FAULT_NOT_RUNNING: i64 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Get,
    Stop,
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub name: String,
}

impl Call {
    pub fn new(op: Op, name: &str) -> Self {
        Self {
            op,
            name: name.to_string(),
        }
    }
}

#[derive(Debug)]
struct FakeProcess {
    statename: String,
    spawnerr: String,
    /// State a successful start leaves the process in.
    start_result: String,
}

#[derive(Debug, Default)]
struct Inner {
    processes: BTreeMap<String, FakeProcess>,
    /// Scripted results per call; `None` lets the call through.
    script: HashMap<(Op, String), VecDeque<Option<ControlError>>>,
    calls: Vec<Call>,
}

#[derive(Debug, Default)]
pub struct FakeSupervisor {
    inner: Mutex<Inner>,
}

impl FakeSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, name: &str, statename: &str) {
        self.add_with_error(name, statename, "");
    }

    pub fn add_with_error(&self, name: &str, statename: &str, spawnerr: &str) {
        self.inner.lock().unwrap().processes.insert(
            name.to_string(),
            FakeProcess {
                statename: statename.to_string(),
                spawnerr: spawnerr.to_string(),
                start_result: "RUNNING".to_string(),
            },
        );
    }

    pub fn remove(&self, name: &str) {
        self.inner.lock().unwrap().processes.remove(name);
    }

    /// Make every subsequent start of `name` land in `statename`.
    pub fn set_start_result(&self, name: &str, statename: &str) {
        if let Some(p) = self.inner.lock().unwrap().processes.get_mut(name) {
            p.start_result = statename.to_string();
        }
    }

    pub fn set_state(&self, name: &str, statename: &str) {
        if let Some(p) = self.inner.lock().unwrap().processes.get_mut(name) {
            p.statename = statename.to_string();
        }
    }

    pub fn state(&self, name: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .processes
            .get(name)
            .map(|p| p.statename.clone())
    }

    fn push_script(&self, op: Op, name: &str, result: Option<ControlError>) {
        self.inner
            .lock()
            .unwrap()
            .script
            .entry((op, name.to_string()))
            .or_default()
            .push_back(result);
    }

    /// Queue an error for the next `op` on `name`. Scripted results are
    /// consumed in order, one per call.
    pub fn fail_next(&self, op: Op, name: &str, err: ControlError) {
        self.push_script(op, name, Some(err));
    }

    /// Let the next `op` on `name` behave normally before any queued failure.
    pub fn pass_next(&self, op: Op, name: &str) {
        self.push_script(op, name, None);
    }

    pub fn fail_next_list(&self, err: ControlError) {
        self.fail_next(Op::List, "", err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Calls touching `name`, without the list queries.
    pub fn calls_for(&self, name: &str) -> Vec<Op> {
        self.calls()
            .into_iter()
            .filter(|c| c.name == name)
            .map(|c| c.op)
            .collect()
    }

    /// Stop and start calls only, in order.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c.op, Op::Stop | Op::Start))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    fn begin(&self, op: Op, name: &str) -> Result<std::sync::MutexGuard<'_, Inner>, ControlError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::new(op, name));
        if let Some(Some(err)) = inner
            .script
            .get_mut(&(op, name.to_string()))
            .and_then(VecDeque::pop_front)
        {
            return Err(err);
        }
        Ok(inner)
    }
}

fn fault(code: i64, message: String) -> ControlError {
    ControlError::Fault { code, message }
}

#[async_trait]
impl ControlService for FakeSupervisor {
    async fn list_processes(&self) -> Result<Vec<ProcessInfo>, ControlError> {
        let inner = self.begin(Op::List, "")?;
        Ok(inner
            .processes
            .iter()
            .map(|(name, p)| ProcessInfo {
                name: name.clone(),
                statename: p.statename.clone(),
                spawnerr: p.spawnerr.clone(),
            })
            .collect())
    }

    async fn get_process(&self, name: &str) -> Result<ProcessInfo, ControlError> {
        let inner = self.begin(Op::Get, name)?;
        let p = inner
            .processes
            .get(name)
            .ok_or_else(|| ControlError::NotFound(name.to_string()))?;
        Ok(ProcessInfo {
            name: name.to_string(),
            statename: p.statename.clone(),
            spawnerr: p.spawnerr.clone(),
        })
    }

    async fn stop_process(&self, name: &str) -> Result<(), ControlError> {
        let mut inner = self.begin(Op::Stop, name)?;
        let p = inner
            .processes
            .get_mut(name)
            .ok_or_else(|| ControlError::NotFound(name.to_string()))?;
        match p.statename.to_ascii_uppercase().as_str() {
            "RUNNING" | "STARTING" | "BACKOFF" => {
                p.statename = "STOPPED".to_string();
                Ok(())
            }
            _ => Err(fault(FAULT_NOT_RUNNING, format!("NOT_RUNNING: {name}"))),
        }
    }

    async fn start_process(&self, name: &str) -> Result<(), ControlError> {
        let mut inner = self.begin(Op::Start, name)?;
        let p = inner
            .processes
            .get_mut(name)
            .ok_or_else(|| ControlError::NotFound(name.to_string()))?;
        if p.statename.eq_ignore_ascii_case("RUNNING") {
            return Err(fault(FAULT_ALREADY_STARTED, format!("ALREADY_STARTED: {name}")));
        }
        p.statename = p.start_result.clone();
        if p.statename.eq_ignore_ascii_case("RUNNING") {
            Ok(())
        } else {
            Err(fault(
                FAULT_ABNORMAL_TERMINATION,
                format!("ABNORMAL_TERMINATION: {name}"),
            ))
        }
    }
}
