use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Help line describing one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// Parameter name.
    pub name: String,
    /// Human readable description.
    pub description: String,
}

/// Ordered help text, independent of the resolved entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    entries: Vec<UsageEntry>,
    descriptions: Vec<String>,
}

impl Usage {
    /// Appends a parameter help line.
    pub fn register(&mut self, name: impl Into<String>, description: impl Into<String>) {
        self.entries.push(UsageEntry {
            name: name.into(),
            description: description.into(),
        });
    }

    /// Appends a free-form trailing line.
    pub fn describe(&mut self, line: impl Into<String>) {
        self.descriptions.push(line.into());
    }

    /// Registered parameter help lines in registration order.
    pub fn entries(&self) -> &[UsageEntry] {
        &self.entries
    }

    /// Renders the complete help text.
    pub fn render(&self, program: &str, additional: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            " Usage: {program} <parameter-file> [-P<name>=<value> ...]"
        );
        let _ = writeln!(out, "        {program} --help");
        if !self.entries.is_empty() {
            out.push('\n');
            let _ = writeln!(out, " Parameters:");
            let width = self
                .entries
                .iter()
                .map(|entry| entry.name.len())
                .max()
                .unwrap_or(0);
            for entry in &self.entries {
                let _ = writeln!(
                    out,
                    "  {:<width$}  {}",
                    entry.name,
                    entry.description,
                    width = width
                );
            }
        }
        if !additional.is_empty() {
            out.push('\n');
            for line in additional.lines() {
                let _ = writeln!(out, " {line}");
            }
        }
        if !self.descriptions.is_empty() {
            out.push('\n');
            for line in &self.descriptions {
                let _ = writeln!(out, " {line}");
            }
        }
        out
    }
}
