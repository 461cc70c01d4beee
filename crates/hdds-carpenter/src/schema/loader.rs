// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML / JSON wire schema loader.

use crate::error::LoaderError;
use crate::schema::WireSchema;
use std::fs;
use std::path::Path;

/// Loads [`WireSchema`] documents from text or files.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Parse a YAML document.
    pub fn parse_yaml(content: &str) -> Result<WireSchema, LoaderError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON document.
    pub fn parse_json(content: &str) -> Result<WireSchema, LoaderError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a schema file; `.yaml`/`.yml` and `.json` are recognised.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<WireSchema, LoaderError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let content = fs::read_to_string(path)?;
        log::debug!("[schema] loading {} ({} bytes)", path.display(), content.len());
        match extension.as_str() {
            "yaml" | "yml" => Self::parse_yaml(&content),
            "json" => Self::parse_json(&content),
            other => Err(LoaderError::UnsupportedFormat(other.to_string())),
        }
    }
}
