// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Encoder naming convention: `odr-audioencoder-<id>` / `odr-padencoder-<id>`,
//! where `<id>` is a non-empty run of hex digits and hyphens shared by exactly
//! one audio/pad pair.

use crate::error::InvalidName;

pub const AUDIO_PREFIX: &str = "odr-audioencoder-";
pub const PAD_PREFIX: &str = "odr-padencoder-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessCategory {
    AudioEncoder,
    PadEncoder,
}

fn is_pair_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn pair_id<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|id| is_pair_id(id))
}

/// Classify a process name, or `None` when it is not an ODR encoder.
pub fn classify(name: &str) -> Option<ProcessCategory> {
    if pair_id(name, AUDIO_PREFIX).is_some() {
        Some(ProcessCategory::AudioEncoder)
    } else if pair_id(name, PAD_PREFIX).is_some() {
        Some(ProcessCategory::PadEncoder)
    } else {
        None
    }
}

/// Name of the pad encoder fed by `audio_name`.
pub fn pad_name_for(audio_name: &str) -> Result<String, InvalidName> {
    pair_id(audio_name, AUDIO_PREFIX)
        .map(|id| format!("{PAD_PREFIX}{id}"))
        .ok_or_else(|| InvalidName(audio_name.to_string()))
}
