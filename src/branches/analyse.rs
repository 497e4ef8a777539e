use crate::git::BranchHistory;
use crate::model::{BranchRecord, DateWindow};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, error, warn};

/// Describes every local branch whose creation date falls in `window`.
///
/// Branches without a resolvable creation date are kept; per-branch lookup
/// failures are logged and leave the corresponding field empty.
pub fn analyse<H: BranchHistory + ?Sized>(
    history: &H,
    default_branch: &str,
    window: &DateWindow,
    now: DateTime<Utc>,
) -> Vec<BranchRecord> {
    let branches = match history.branches() {
        Ok(branches) if !branches.is_empty() => branches,
        Ok(_) => {
            warn!("No branches found or unable to fetch branches.");
            return Vec::new();
        }
        Err(e) => {
            warn!(event = "branches.list_failed", error = %e, "No branches found or unable to fetch branches.");
            return Vec::new();
        }
    };
    debug!("Branches found: {branches:?}");

    let merged: HashSet<String> = match history.merged_branches() {
        Ok(list) => list.into_iter().collect(),
        Err(e) => {
            error!(event = "branches.merged_failed", error = %e, "Unable to list merged branches");
            HashSet::new()
        }
    };

    let mut records = Vec::new();
    for branch in branches {
        if branch.contains("remotes/") {
            debug!("Skipping remote branch: {branch}");
            continue;
        }
        debug!("Analysing branch: {branch}");

        let created = match history.creation_date(&branch, default_branch) {
            Ok(Some(created)) => Some(created),
            Ok(None) => {
                warn!("No unique commits found for branch: {branch}");
                None
            }
            Err(e) => {
                warn!(event = "branches.creation_date_failed", branch = %branch, error = %e, "No valid commit date found");
                None
            }
        };

        if let Some(created) = created {
            if !window.contains(&created) {
                debug!("Branch {branch} creation date {created} is outside date range.");
                continue;
            }
        }

        let parent = match history.parent_branch(&branch, default_branch) {
            Ok(parent) => parent,
            Err(e) => {
                warn!(event = "branches.parent_failed", branch = %branch, error = %e, "Unable to determine parent branch");
                None
            }
        };

        let record = BranchRecord {
            merged: merged.contains(&branch),
            age_days: created.map(|c| (now - c).num_days()),
            created,
            parent,
            branch,
        };
        debug!("{record:?}");
        records.push(record);
    }

    records
}
