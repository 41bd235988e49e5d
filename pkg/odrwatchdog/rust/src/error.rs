// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use thiserror::Error;

/// Supervisor fault code for an unknown process name.
pub const FAULT_BAD_NAME: i64 = 10;
/// Supervisor fault code for starting a process that is already running.
pub const FAULT_ALREADY_STARTED: i64 = 60;

/// Failure of a single call against the control service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("control service unreachable: {0}")]
    Transport(String),
    #[error("no such process: {0}")]
    NotFound(String),
    #[error("supervisor fault {code}: {message}")]
    Fault { code: i64, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ControlError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ControlError::NotFound(_))
    }

    pub fn is_fault(&self, fault_code: i64) -> bool {
        matches!(self, ControlError::Fault { code, .. } if *code == fault_code)
    }
}

/// The process table could not be read; the cycle observes nothing.
#[derive(Error, Debug)]
#[error("unable to retrieve process status: {source}")]
pub struct SnapshotError {
    #[from]
    pub source: ControlError,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not an audio encoder name: {0:?}")]
pub struct InvalidName(pub String);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}
