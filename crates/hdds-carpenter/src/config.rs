// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Carpenter configuration.
//!
//! - **Static**: constants shared by every build run.
//! - **Dynamic**: [`CarpenterConfig`], loadable from YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! cache_capacity: 512
//! strict_known_types: true
//! log_passes: false
//! ```

use crate::error::LoaderError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default number of fabricated types retained by [`crate::TypeCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Prefix of generated accessor names (`name` -> `getName`).
pub const ACCESSOR_PREFIX: &str = "get";

/// Runtime configuration for extraction and build runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CarpenterConfig {
    /// Capacity of the fabricated type cache.
    pub cache_capacity: usize,
    /// Require a local type to match the wire shape before treating it as
    /// known. When `false`, any same-named local type is reused.
    pub strict_known_types: bool,
    /// Log every build pass at `info` instead of `debug`.
    pub log_passes: bool,
}

impl Default for CarpenterConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            strict_known_types: true,
            log_passes: false,
        }
    }
}

impl CarpenterConfig {
    /// Parse YAML content; missing keys take their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, LoaderError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
