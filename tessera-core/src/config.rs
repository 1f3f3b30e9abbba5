//! Configuration types
//!
//! Loaded from TOML (`tessera.toml`) with environment overrides. Every field has a
//! default, so an empty file yields the built-in group table.

use crate::error::{ConfigError, TesseraError, TesseraResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Group key of the motion group, built by its own formatter path.
pub const MOTION_GROUP: &str = "Motion";

/// How non-fatal reference problems are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Record diagnostics only.
    Ignore,
    /// Record diagnostics and emit each one through `tracing::warn!`.
    #[default]
    Warn,
}

/// Banner written at the top of every generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HeaderConfig {
    pub banner: String,
    pub include_timestamp: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            banner: "Do not edit directly, this file was auto-generated.".to_string(),
            include_timestamp: true,
        }
    }
}

/// Per-group processing rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GroupConfig {
    /// Emit per-group style sheets through the generic generator.
    pub include_in_build: bool,
    /// List the group in the aggregate index.
    pub include_in_index: bool,
    /// Leading reference segments rewritten to carry this group's key,
    /// e.g. `{typescale.body}` -> `{Responsive/Mobile.typescale.body}`.
    pub qualify_references: Vec<String>,
    /// Extra header line for the group's files.
    pub description: Option<String>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            include_in_build: true,
            include_in_index: true,
            qualify_references: Vec::new(),
            description: None,
        }
    }
}

/// Master configuration for a token build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PipelineConfig {
    pub header: HeaderConfig,
    pub unresolved_references: ReferencePolicy,
    pub groups: BTreeMap<String, GroupConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(
            MOTION_GROUP.to_string(),
            GroupConfig {
                include_in_build: false,
                ..GroupConfig::default()
            },
        );
        for responsive in ["Responsive/Desktop", "Responsive/Mobile"] {
            groups.insert(
                responsive.to_string(),
                GroupConfig {
                    qualify_references: vec!["typescale".to_string()],
                    ..GroupConfig::default()
                },
            );
        }
        groups.insert(
            "Focus".to_string(),
            GroupConfig {
                description: Some("Focus ring box shadows".to_string()),
                ..GroupConfig::default()
            },
        );

        Self {
            header: HeaderConfig::default(),
            unresolved_references: ReferencePolicy::default(),
            groups,
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document. Groups named in the file replace the built-in entry for
    /// that key; built-in groups not mentioned are kept.
    pub fn from_toml_str(text: &str) -> TesseraResult<Self> {
        let parsed: PipelineConfig = toml::from_str(text).map_err(|err| ConfigError::Parse {
            reason: err.to_string(),
        })?;

        let mut groups = Self::default().groups;
        groups.extend(parsed.groups);
        let config = Self {
            header: parsed.header,
            unresolved_references: parsed.unresolved_references,
            groups,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rules for a group, falling back to defaults for unlisted groups.
    pub fn group(&self, key: &str) -> GroupConfig {
        self.groups.get(key).cloned().unwrap_or_default()
    }

    /// Apply environment overrides.
    ///
    /// Environment variables:
    /// - `TESSERA_REFERENCE_POLICY`: "ignore" or "warn"
    /// - `TESSERA_HEADER_TIMESTAMP`: "true"/"1" or "false"/"0"
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(policy) = std::env::var("TESSERA_REFERENCE_POLICY") {
            match policy.trim().to_ascii_lowercase().as_str() {
                "ignore" => self.unresolved_references = ReferencePolicy::Ignore,
                "warn" => self.unresolved_references = ReferencePolicy::Warn,
                _ => {}
            }
        }
        if let Ok(flag) = std::env::var("TESSERA_HEADER_TIMESTAMP") {
            match flag.trim() {
                "true" | "1" => self.header.include_timestamp = true,
                "false" | "0" => self.header.include_timestamp = false,
                _ => {}
            }
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> TesseraResult<()> {
        if self.header.banner.trim().is_empty() {
            return Err(TesseraError::Config(ConfigError::InvalidValue {
                field: "header.banner".to_string(),
                value: self.header.banner.clone(),
                reason: "banner must not be empty".to_string(),
            }));
        }

        for (key, group) in &self.groups {
            if group
                .qualify_references
                .iter()
                .any(|prefix| prefix.trim().is_empty())
            {
                return Err(TesseraError::Config(ConfigError::InvalidValue {
                    field: format!("groups.{}.qualify_references", key),
                    value: format!("{:?}", group.qualify_references),
                    reason: "reference prefixes must not be blank".to_string(),
                }));
            }
        }

        Ok(())
    }

    /// Check that every explicitly configured group exists in `present`.
    /// Built-in groups are exempt; they are optional in any document.
    pub fn check_groups<'a>(&self, present: impl IntoIterator<Item = &'a str>) -> TesseraResult<()> {
        let present: Vec<&str> = present.into_iter().collect();
        let builtin = Self::default();
        for key in self.groups.keys() {
            if builtin.groups.contains_key(key) {
                continue;
            }
            if !present.contains(&key.as_str()) {
                return Err(TesseraError::Config(ConfigError::UnknownGroup { group: key.clone() }));
            }
        }
        Ok(())
    }
}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
