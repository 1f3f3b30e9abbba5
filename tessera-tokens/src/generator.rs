//! Style sheet generation
//!
//! Renders per-group SCSS and CSS declaration files plus the aggregate SCSS index
//! from a resolved [`TokenEngine`]. Output paths are relative to the build root:
//!
//! ```text
//! scss/_<stem>.scss             $name: <concrete>;
//! scss/references/_<stem>.scss  $name: <symbolic>;
//! css/<stem>.css                :root { --name: <concrete>; }
//! scss/index.scss               @import '<stem>';
//! ```
//!
//! The motion group is rendered separately from its own formatter and has no
//! symbolic form.

use crate::document::file_stem;
use crate::engine::TokenEngine;
use crate::format::format_motion_value;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fmt::Write;
use tessera_core::{Dialect, GroupConfig, HeaderConfig, PipelineConfig, Target, MOTION_GROUP};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d T %H:%M:%S";
const INDEX_TITLE: &str = "Index file importing all token groups";

/// Per-run generation inputs that are not configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Time written into headers when the header config asks for it.
    pub generated_at: NaiveDateTime,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            generated_at: Local::now().naive_local(),
        }
    }
}

impl GeneratorOptions {
    pub fn at(generated_at: NaiveDateTime) -> Self {
        Self { generated_at }
    }
}

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub path: String,
    pub contents: String,
}

/// How a group was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Generic,
    Motion,
    Skipped,
}

/// Planning record for one group, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupPlan {
    pub key: String,
    pub stem: String,
    pub kind: GroupKind,
    pub indexed: bool,
    pub entries: usize,
}

/// Everything a generator run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorOutput {
    pub plan: Vec<GroupPlan>,
    pub files: Vec<GeneratedFile>,
}

/// Renders style sheets from an engine.
pub struct Generator<'a> {
    engine: &'a TokenEngine,
    config: &'a PipelineConfig,
    options: &'a GeneratorOptions,
}

impl<'a> Generator<'a> {
    pub fn new(
        engine: &'a TokenEngine,
        config: &'a PipelineConfig,
        options: &'a GeneratorOptions,
    ) -> Self {
        Self {
            engine,
            config,
            options,
        }
    }

    /// Render every group in `order`, then the index.
    pub fn generate(&self, order: &[String]) -> GeneratorOutput {
        let mut output = GeneratorOutput::default();

        for key in order {
            let group = self.config.group(key);
            let stem = file_stem(key);

            let (kind, entries, files) = if key == MOTION_GROUP {
                let (entries, files) = self.render_motion(&group, &stem);
                let kind = if files.is_empty() {
                    GroupKind::Skipped
                } else {
                    GroupKind::Motion
                };
                (kind, entries, files)
            } else if group.include_in_build {
                let (entries, files) = self.render_group(key, &group, &stem);
                (GroupKind::Generic, entries, files)
            } else {
                (GroupKind::Skipped, 0, Vec::new())
            };

            tracing::debug!(group = %key, entries, files = files.len(), "group rendered");
            output.files.extend(files);
            output.plan.push(GroupPlan {
                key: key.clone(),
                stem,
                kind,
                indexed: group.include_in_index && kind != GroupKind::Skipped,
                entries,
            });
        }

        output.files.push(self.render_index(&output.plan));
        output
    }

    fn render_group(&self, key: &str, group: &GroupConfig, stem: &str) -> (usize, Vec<GeneratedFile>) {
        let header = &self.config.header;
        let description = group.description.as_deref();
        let mut concrete = scss_header(header, self.timestamp(), &[&format!("Group: {}", key)], description);
        let mut symbolic = concrete.clone();
        let mut css = css_header(header, self.timestamp(), key, description);
        css.push_str(":root {\n");

        let mut count = 0;
        for (idx, entry) in self.engine.group_entries(key) {
            let concrete_scss = self.engine.render_entry(idx, Target::Concrete, Dialect::Scss);
            let symbolic_scss = self.engine.render_entry(idx, Target::Symbolic, Dialect::Scss);
            let concrete_css = self.engine.render_entry(idx, Target::Concrete, Dialect::Css);

            let _ = writeln!(concrete, "${}: {};", entry.name, concrete_scss);
            let _ = writeln!(symbolic, "${}: {};", entry.name, symbolic_scss);
            let _ = writeln!(css, "  --{}: {};", entry.name, concrete_css);
            count += 1;
        }
        css.push_str("}\n");

        let files = vec![
            GeneratedFile {
                path: format!("scss/_{}.scss", stem),
                contents: concrete,
            },
            GeneratedFile {
                path: format!("scss/references/_{}.scss", stem),
                contents: symbolic,
            },
            GeneratedFile {
                path: format!("css/{}.css", stem),
                contents: css,
            },
        ];
        (count, files)
    }

    /// Motion entries sorted by dotted path; nothing is written for an empty group.
    fn render_motion(&self, group: &GroupConfig, stem: &str) -> (usize, Vec<GeneratedFile>) {
        let mut entries: Vec<_> = self.engine.group_entries(MOTION_GROUP).collect();
        if entries.is_empty() {
            return (0, Vec::new());
        }
        entries.sort_by(|(_, a), (_, b)| a.path_key.cmp(&b.path_key));

        let header = &self.config.header;
        let description = group.description.as_deref();
        let mut scss = scss_header(
            header,
            self.timestamp(),
            &[&format!("Group: {}", MOTION_GROUP)],
            description,
        );
        let mut css = css_header(header, self.timestamp(), MOTION_GROUP, description);
        css.push_str(":root {\n");

        for (idx, entry) in &entries {
            let value = self.engine.resolve_entry(*idx, Target::Concrete);
            let formatted = format_motion_value(&entry.path, &value);
            let _ = writeln!(scss, "${}: {};", entry.name, formatted);
            let _ = writeln!(css, "  --{}: {};", entry.name, formatted);
        }
        css.push_str("}\n");

        let files = vec![
            GeneratedFile {
                path: format!("scss/_{}.scss", stem),
                contents: scss,
            },
            GeneratedFile {
                path: format!("css/{}.css", stem),
                contents: css,
            },
        ];
        (entries.len(), files)
    }

    fn render_index(&self, plan: &[GroupPlan]) -> GeneratedFile {
        let mut contents = scss_header(&self.config.header, self.timestamp(), &[INDEX_TITLE], None);
        let mut imports = 0;
        for group in plan.iter().filter(|group| group.indexed) {
            let _ = writeln!(contents, "@import '{}';", group.stem);
            imports += 1;
        }
        // An index with nothing to import still ends on a blank line.
        if imports == 0 {
            contents.push('\n');
        }
        GeneratedFile {
            path: "scss/index.scss".to_string(),
            contents,
        }
    }

    fn timestamp(&self) -> Option<String> {
        self.config
            .header
            .include_timestamp
            .then(|| self.options.generated_at.format(TIMESTAMP_FORMAT).to_string())
    }
}

fn scss_header(
    header: &HeaderConfig,
    timestamp: Option<String>,
    lines: &[&str],
    description: Option<&str>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// {}", header.banner);
    if let Some(ts) = timestamp {
        let _ = writeln!(out, "// Generated: {}", ts);
    }
    for line in lines {
        let _ = writeln!(out, "// {}", line);
    }
    if let Some(description) = description {
        let _ = writeln!(out, "// {}", description);
    }
    out.push('\n');
    out
}

fn css_header(
    header: &HeaderConfig,
    timestamp: Option<String>,
    group: &str,
    description: Option<&str>,
) -> String {
    let mut out = String::from("/**\n");
    let _ = writeln!(out, " * {}", header.banner);
    if let Some(ts) = timestamp {
        let _ = writeln!(out, " * Generated: {}", ts);
    }
    let _ = writeln!(out, " * Group: {}", group);
    if let Some(description) = description {
        let _ = writeln!(out, " * {}", description);
    }
    out.push_str(" */\n\n");
    out
}
