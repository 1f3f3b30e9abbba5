//! Build pipeline: source text in, generated files and diagnostics out.
//!
//! ```text
//! document text (+ motion text)
//!     ↓ parse / merge motion
//! TokenDocument ── check configured groups, qualify references
//!     ↓ flatten
//! TokenEngine
//!     ↓ generate (group order)
//! BuildReport { plan, files, diagnostics, source_hash }
//! ```
//!
//! Loading the sources from disk and writing the files out are left to the caller.

use crate::document::TokenDocument;
use crate::engine::TokenEngine;
use crate::generator::{GeneratedFile, Generator, GeneratorOptions, GroupPlan};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tessera_core::{Diagnostic, PipelineConfig, TesseraResult};

/// Source texts for one build.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildSources<'a> {
    pub document: &'a str,
    /// Optional standalone motion document holding a `Motion` object.
    pub motion: Option<&'a str>,
}

impl<'a> BuildSources<'a> {
    pub fn new(document: &'a str) -> Self {
        Self {
            document,
            motion: None,
        }
    }

    pub fn with_motion(mut self, motion: &'a str) -> Self {
        self.motion = Some(motion);
        self
    }
}

/// Result of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub plan: Vec<GroupPlan>,
    pub files: Vec<GeneratedFile>,
    pub diagnostics: Vec<Diagnostic>,
    /// Hex SHA-256 of the main document text.
    pub source_hash: String,
}

impl BuildReport {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|file| file.path == path)
    }
}

/// Configured token build.
#[derive(Debug, Clone, Default)]
pub struct TokenPipeline {
    config: PipelineConfig,
    options: GeneratorOptions,
}

impl TokenPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            options: GeneratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run a full build. Only a missing or malformed document, or a configured
    /// group absent from it, is fatal.
    pub fn build(&self, sources: BuildSources<'_>) -> TesseraResult<BuildReport> {
        let mut document = TokenDocument::parse(sources.document)?;
        if let Some(motion) = sources.motion {
            document = document.with_motion_source(motion)?;
        }

        self.config
            .check_groups(document.root().keys().map(String::as_str))?;
        document.apply_config(&self.config);

        let order = document.group_order();
        tracing::debug!(groups = ?order, "group order");

        let engine = TokenEngine::from_document(&document, self.config.unresolved_references);
        let output = Generator::new(&engine, &self.config, &self.options).generate(&order);
        let diagnostics = engine.diagnostics();

        tracing::info!(
            groups = output.plan.len(),
            tokens = engine.len(),
            files = output.files.len(),
            diagnostics = diagnostics.len(),
            "design tokens built"
        );

        Ok(BuildReport {
            plan: output.plan,
            files: output.files,
            diagnostics,
            source_hash: sha256_hex(sources.document),
        })
    }
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
