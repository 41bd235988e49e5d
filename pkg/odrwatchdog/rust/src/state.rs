// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;

/// Lifecycle state of a supervisor-managed process, as reported by `statename`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    Stopped,
    Starting,
    Running,
    /// Spawn failed; the supervisor is waiting before the next attempt.
    Backoff,
    Stopping,
    /// Exited from RUNNING (expectedly or not).
    Exited,
    /// Could not be started; the supervisor gave up.
    Fatal,
    /// Anything the supervisor reports that we do not recognise, or a process
    /// we could not observe at all.
    Unknown,
}

impl ProcessState {
    /// Parse a supervisor state name. Comparison is case-insensitive and
    /// unrecognised names map to `Unknown`.
    pub fn parse(statename: &str) -> Self {
        match statename.trim().to_ascii_uppercase().as_str() {
            "STOPPED" => ProcessState::Stopped,
            "STARTING" => ProcessState::Starting,
            "RUNNING" => ProcessState::Running,
            "BACKOFF" => ProcessState::Backoff,
            "STOPPING" => ProcessState::Stopping,
            "EXITED" => ProcessState::Exited,
            "FATAL" => ProcessState::Fatal,
            _ => ProcessState::Unknown,
        }
    }

    pub fn is_running(self) -> bool {
        self == ProcessState::Running
    }

    /// EXITED and FATAL are the only states treated as an encoder failure.
    pub fn is_failure(self) -> bool {
        matches!(self, ProcessState::Exited | ProcessState::Fatal)
    }

    /// Whether a restart must stop the process before starting it again.
    pub(crate) fn needs_stop_before_start(self) -> bool {
        self != ProcessState::Stopped
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::Stopped => write!(f, "STOPPED"),
            ProcessState::Starting => write!(f, "STARTING"),
            ProcessState::Running => write!(f, "RUNNING"),
            ProcessState::Backoff => write!(f, "BACKOFF"),
            ProcessState::Stopping => write!(f, "STOPPING"),
            ProcessState::Exited => write!(f, "EXITED"),
            ProcessState::Fatal => write!(f, "FATAL"),
            ProcessState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
