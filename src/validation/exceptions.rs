//! Sanctioned duplicates
//!
//! A small, named table of station groups that may share a name or an
//! international code. An explicit file wins over the user config directory,
//! which wins over the built-in table.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::Station;

/// The table shipped with the tool
const BUILTIN_EXCEPTIONS: &str = include_str!("../../resources/exceptions.toml");

/// File name looked up in configuration directories
pub const EXCEPTIONS_FILE_NAME: &str = "exceptions.toml";

/// Which uniqueness check an exception applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateCheck {
    Name,
    Ibnr,
}

/// Which duplicate group an exception covers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMatcher {
    /// Every station of the group declares this international code
    AllIbnr(String),
    /// The group consists of exactly these registry codes
    Pkpplk(Vec<String>),
}

impl GroupMatcher {
    pub fn matches(&self, group: &[&Station]) -> bool {
        if group.is_empty() {
            return false;
        }

        match self {
            GroupMatcher::AllIbnr(code) => group
                .iter()
                .all(|station| station.ibnr.as_deref() == Some(code.as_str())),
            GroupMatcher::Pkpplk(codes) => {
                let expected: BTreeSet<&str> = codes.iter().map(String::as_str).collect();
                let actual: BTreeSet<&str> = group.iter().map(|s| s.pkpplk.as_str()).collect();
                group.len() == codes.len() && expected == actual
            }
        }
    }
}

/// One sanctioned duplicate group
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExceptionRule {
    pub id: String,
    pub check: DuplicateCheck,
    pub reason: String,
    #[serde(rename = "match")]
    pub matcher: GroupMatcher,
}

/// Root of an exceptions TOML file
#[derive(Debug, Clone, Deserialize)]
struct ExceptionFile {
    #[serde(default, rename = "exception")]
    exceptions: Vec<ExceptionRule>,
}

/// All sanctioned duplicate groups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExceptionTable {
    rules: Vec<ExceptionRule>,
    source: Option<PathBuf>,
}

impl ExceptionTable {
    /// A table that sanctions nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(rules: Vec<ExceptionRule>) -> Self {
        Self {
            rules,
            source: None,
        }
    }

    /// The table embedded in the binary
    pub fn builtin() -> Self {
        match Self::from_toml_str(BUILTIN_EXCEPTIONS) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("Failed to parse built-in exception table: {:#}. Using an empty one.", e);
                Self::empty()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ExceptionFile = toml::from_str(content).context("parse exception table")?;
        Ok(Self::new(file.exceptions))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let mut table =
            Self::from_toml_str(&content).with_context(|| format!("load {}", path.display()))?;
        table.source = Some(path.to_path_buf());
        Ok(table)
    }

    /// Resolve the table to use: an explicit file, else the first
    /// `exceptions.toml` found in `search_dirs`, else the built-in table.
    pub fn resolve(explicit: Option<&Path>, search_dirs: &[PathBuf]) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        for dir in search_dirs {
            let candidate = dir.join(EXCEPTIONS_FILE_NAME);
            if candidate.is_file() {
                log::info!("Using exception table {}", candidate.display());
                return Self::from_path(&candidate);
            }
        }

        Ok(Self::builtin())
    }

    pub fn rules(&self) -> &[ExceptionRule] {
        &self.rules
    }

    /// Where the table was read from, `None` for built-in or in-memory tables
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The rule sanctioning this duplicate group, if any
    pub fn sanctioning(&self, check: DuplicateCheck, group: &[&Station]) -> Option<&ExceptionRule> {
        self.rules
            .iter()
            .filter(|rule| rule.check == check)
            .find(|rule| rule.matcher.matches(group))
    }
}
