// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use anyhow::{Context, Result};
use slice27_core::{SliceSettings, DEFAULT_MARGIN, DEFAULT_PARALLEL_THRESHOLD};

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gap kept between inner and outer box.
    pub margin: f64,
    /// Vertex count from which passes run on the rayon pool.
    pub parallel_threshold: usize,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            margin: lookup("SLICE27_MARGIN")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MARGIN),
            parallel_threshold: lookup("SLICE27_PARALLEL_THRESHOLD")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "warn,slice27_cli=info".into()),
        }
    }

    /// Validated slicing settings
    pub fn settings(&self) -> Result<SliceSettings> {
        Ok(SliceSettings::default()
            .with_margin(self.margin)
            .with_context(|| format!("invalid margin {}", self.margin))?
            .with_parallel_threshold(self.parallel_threshold))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
