//! Capabilities the reports need from version control.
//!
//! All knowledge of the tool's text formats sits behind these traits, so the
//! report logic runs against synthetic fixtures in tests.

use crate::error::Result;
use crate::model::{DateWindow, StatLine};
use chrono::{DateTime, Utc};
use std::fmt;

/// Which pair of trees a numeric diff compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiffSpec {
    /// First parent of a merge against its second parent.
    MergeParents(String),
    /// A commit against its (first) parent.
    ParentOf(String),
}

impl DiffSpec {
    /// Revision arguments for `git diff`.
    pub fn revisions(&self) -> Vec<String> {
        match self {
            DiffSpec::MergeParents(id) => vec![format!("{id}^1..{id}^2")],
            DiffSpec::ParentOf(id) => vec![format!("{id}^"), id.clone()],
        }
    }
}

impl fmt::Display for DiffSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.revisions().join(" "))
    }
}

pub trait HistoryProvider {
    /// Raw log text: quoted `id,date,subject` headers each followed by numstat lines.
    fn fetch_log(&self, branch: &str, window: &DateWindow) -> Result<String>;

    fn parents(&self, commit_id: &str) -> Result<Vec<String>>;

    fn diff_stat(&self, spec: &DiffSpec) -> Result<Vec<StatLine>>;
}

pub trait BranchHistory {
    fn default_branch(&self) -> Result<String>;

    fn branches(&self) -> Result<Vec<String>>;

    /// Date of the first commit on `branch` that is not on `default_branch`.
    fn creation_date(&self, branch: &str, default_branch: &str) -> Result<Option<DateTime<Utc>>>;

    fn parent_branch(&self, branch: &str, default_branch: &str) -> Result<Option<String>>;

    fn merged_branches(&self) -> Result<Vec<String>>;
}
