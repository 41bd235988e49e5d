// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::census::StatusSnapshot;
use crate::error::InvalidName;
use crate::naming;
use crate::restart::{RestartController, RestartOutcome};
use crate::state::ProcessState;
use log::{info, warn};

/// What happened to the audio half of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioAction {
    /// Not in a failure state in the fresh census; left alone.
    Skipped(ProcessState),
    Restarted(RestartOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    pub audio_name: String,
    pub pad_name: String,
    pub audio: AudioAction,
    pub pad: RestartOutcome,
}

/// Recovers an audio encoder together with the pad encoder reading its output.
///
/// The pad encoder is always force-restarted: after its audio source went away
/// it can report RUNNING while being out of sync.
#[derive(Clone)]
pub struct PairRecoveryPolicy {
    snapshot: StatusSnapshot,
    restarts: RestartController,
}

impl PairRecoveryPolicy {
    pub fn new(snapshot: StatusSnapshot, restarts: RestartController) -> Self {
        Self { snapshot, restarts }
    }

    pub async fn recover_pair(&self, audio_name: &str) -> Result<PairOutcome, InvalidName> {
        let pad_name = naming::pad_name_for(audio_name)?;

        let census = self.snapshot.capture().await;
        let audio_state = census.state_of(audio_name);

        let audio = if audio_state.is_failure() {
            warn!("audio encoder failure detected: restarting {audio_name} (state={audio_state})");
            AudioAction::Restarted(self.restarts.ensure_running(audio_name, false).await)
        } else {
            info!("[{audio_name}] state is {audio_state}, no restart needed");
            AudioAction::Skipped(audio_state)
        };

        info!("forcing restart of the associated {pad_name}");
        let pad = self.restarts.ensure_running(&pad_name, true).await;

        Ok(PairOutcome {
            audio_name: audio_name.to_string(),
            pad_name,
            audio,
            pad,
        })
    }
}
