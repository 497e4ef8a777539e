use super::parse::ModifiedLines;
use crate::error::Result;
use crate::git::{DiffSpec, HistoryProvider};
use crate::model::StatLine;
use tracing::{debug, error};

/// Picks the comparison for a commit with `parent_count` parents.
///
/// Exactly two parents means a merge, compared parent against parent.
/// Anything else is compared against its first parent; a root commit has
/// none, and the provider's failure to resolve it is reported by the caller.
pub fn diff_spec_for(commit_id: &str, parent_count: usize) -> DiffSpec {
    if parent_count == 2 {
        DiffSpec::MergeParents(commit_id.to_string())
    } else {
        DiffSpec::ParentOf(commit_id.to_string())
    }
}

/// Recomputes each commit's added+removed lines against the right comparison point.
pub struct MergeAwareCounter<'a, P: HistoryProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: HistoryProvider + ?Sized> MergeAwareCounter<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    pub fn count(&self, commit_id: &str) -> Result<u64> {
        let parents = self.provider.parents(commit_id)?;
        let spec = diff_spec_for(commit_id, parents.len());
        debug!(
            event = "churn.diff_selected",
            commit = commit_id,
            parents = parents.len(),
            diff = %spec
        );

        let stats = self.provider.diff_stat(&spec)?;
        let modified = stats
            .iter()
            .map(StatLine::churn)
            .fold(0u64, u64::saturating_add);
        debug!("Modified lines in commit {commit_id}: {modified}");
        Ok(modified)
    }
}

impl<P: HistoryProvider + ?Sized> ModifiedLines for MergeAwareCounter<'_, P> {
    fn modified_lines(&self, commit_id: &str) -> u64 {
        match self.count(commit_id) {
            Ok(n) => n,
            Err(e) => {
                error!(
                    event = "churn.modified_lines_failed",
                    commit = commit_id,
                    error = %e,
                    "Error getting modified lines for commit"
                );
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::model::{DateWindow, StatLine};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeHistory {
        parents: HashMap<String, Vec<String>>,
        diffs: HashMap<DiffSpec, Vec<StatLine>>,
        requested: RefCell<Vec<DiffSpec>>,
    }

    impl FakeHistory {
        fn with_commit(mut self, id: &str, parents: &[&str]) -> Self {
            self.parents
                .insert(id.to_string(), parents.iter().map(|p| p.to_string()).collect());
            self
        }

        fn with_diff(mut self, spec: DiffSpec, lines: &[&str]) -> Self {
            let stats = lines.iter().filter_map(|l| StatLine::parse(l)).collect();
            self.diffs.insert(spec, stats);
            self
        }
    }

    impl HistoryProvider for FakeHistory {
        fn fetch_log(&self, _branch: &str, _window: &DateWindow) -> Result<String> {
            Ok(String::new())
        }

        fn parents(&self, commit_id: &str) -> Result<Vec<String>> {
            self.parents
                .get(commit_id)
                .cloned()
                .ok_or_else(|| ReportError::Parse(format!("unknown commit {commit_id}")))
        }

        fn diff_stat(&self, spec: &DiffSpec) -> Result<Vec<StatLine>> {
            self.requested.borrow_mut().push(spec.clone());
            self.diffs.get(spec).cloned().ok_or_else(|| ReportError::CommandFailed {
                command: format!("git diff --numstat {spec}"),
                status: "exit status: 128".to_string(),
                stderr: "fatal: ambiguous argument".to_string(),
            })
        }
    }

    #[test]
    fn merge_commit_diffs_its_two_parents() {
        let history = FakeHistory::default()
            .with_commit("m", &["p1", "p2"])
            .with_diff(DiffSpec::MergeParents("m".to_string()), &["2\t2\tshared.txt"])
            .with_diff(DiffSpec::ParentOf("m".to_string()), &["100\t0\tshared.txt"]);

        let counter = MergeAwareCounter::new(&history);
        assert_eq!(counter.modified_lines("m"), 4);
        assert_eq!(
            *history.requested.borrow(),
            vec![DiffSpec::MergeParents("m".to_string())]
        );
    }

    #[test]
    fn regular_commit_diffs_against_parent() {
        let history = FakeHistory::default()
            .with_commit("c", &["p"])
            .with_diff(
                DiffSpec::ParentOf("c".to_string()),
                &["3\t1\ta.rs", "-\t-\timage.png", "0\t5\tb.rs"],
            );

        let counter = MergeAwareCounter::new(&history);
        assert_eq!(counter.modified_lines("c"), 9);
    }

    #[test]
    fn octopus_merge_uses_first_parent_path() {
        assert_eq!(diff_spec_for("o", 3), DiffSpec::ParentOf("o".to_string()));
        assert_eq!(diff_spec_for("r", 0), DiffSpec::ParentOf("r".to_string()));
    }

    #[test]
    fn root_commit_without_parent_counts_zero() {
        let history = FakeHistory::default().with_commit("root", &[]);
        let counter = MergeAwareCounter::new(&history);
        assert!(counter.count("root").is_err());
        assert_eq!(counter.modified_lines("root"), 0);
    }

    #[test]
    fn parent_lookup_failure_counts_zero() {
        let history = FakeHistory::default();
        let counter = MergeAwareCounter::new(&history);
        assert_eq!(counter.modified_lines("missing"), 0);
        assert!(history.requested.borrow().is_empty());
    }
}
