use super::provider::{BranchHistory, DiffSpec, HistoryProvider};
use super::runner::CommandRunner;
use crate::error::{ReportError, Result};
use crate::model::{DateWindow, StatLine};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, warn};

/// Log format whose headers the churn parser recognises by the leading quote.
pub const LOG_PRETTY_FORMAT: &str = "--pretty=format:'%H,%ad,%s'";

/// History provider backed by the `git` binary.
pub struct GitCli {
    runner: CommandRunner,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            runner: CommandRunner::git(dir),
        }
    }
}

impl HistoryProvider for GitCli {
    fn fetch_log(&self, branch: &str, window: &DateWindow) -> Result<String> {
        let since = window.since_arg();
        let until = window.until_arg();
        self.runner.run(&[
            "log",
            branch,
            "--since",
            &since,
            "--until",
            &until,
            "--date=iso-strict",
            LOG_PRETTY_FORMAT,
            "--numstat",
            "--",
        ])
    }

    fn parents(&self, commit_id: &str) -> Result<Vec<String>> {
        let out = self
            .runner
            .run(&["show", "--no-patch", "--pretty=%P", commit_id])?;
        Ok(out.split_whitespace().map(str::to_string).collect())
    }

    fn diff_stat(&self, spec: &DiffSpec) -> Result<Vec<StatLine>> {
        let revisions = spec.revisions();
        let mut args = vec!["diff", "--numstat"];
        args.extend(revisions.iter().map(String::as_str));
        let out = self.runner.run(&args)?;
        Ok(parse_numstat(&out))
    }
}

impl BranchHistory for GitCli {
    fn default_branch(&self) -> Result<String> {
        let out = self
            .runner
            .run(&["symbolic-ref", "refs/remotes/origin/HEAD"])?;
        short_ref_name(&out)
            .ok_or_else(|| ReportError::Parse("symbolic-ref returned no branch name".to_string()))
    }

    fn branches(&self) -> Result<Vec<String>> {
        let out = self.runner.run(&["branch", "--all", "--no-color"])?;
        Ok(parse_branch_list(&out))
    }

    fn creation_date(&self, branch: &str, default_branch: &str) -> Result<Option<DateTime<Utc>>> {
        let exclude = format!("^{default_branch}");
        let out = self.runner.run(&[
            "rev-list",
            "--boundary",
            branch,
            &exclude,
            "--reverse",
            "--max-parents=1",
        ])?;
        let Some(first) = first_unique_commit(&out) else {
            return Ok(None);
        };

        let date = self.runner.run(&["show", "-s", "--format=%ci", &first])?;
        parse_commit_date(&date).map(Some)
    }

    fn parent_branch(&self, branch: &str, default_branch: &str) -> Result<Option<String>> {
        let base = self.runner.run(&["merge-base", default_branch, branch])?;
        let base = base.trim();
        if base.is_empty() {
            return Ok(None);
        }
        let name = self.runner.run(&["name-rev", "--name-only", base])?;
        let name = name.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    fn merged_branches(&self) -> Result<Vec<String>> {
        let out = self.runner.run(&["branch", "--no-color", "--merged"])?;
        Ok(parse_branch_list(&out))
    }
}

/// Parses `git diff --numstat` output, skipping lines that are not stat triples.
pub fn parse_numstat(output: &str) -> Vec<StatLine> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = StatLine::parse(line);
            match &parsed {
                Some(stat) if stat.has_fallback() => {
                    warn!(
                        event = "churn.count_fallback",
                        path = %stat.path,
                        "Non-numeric count treated as 0"
                    );
                }
                Some(_) => {}
                None => {
                    warn!(event = "git.numstat_malformed", line = %line, "Skipping malformed stat line");
                }
            }
            parsed
        })
        .collect()
}

/// Branch names from `git branch` output with current/worktree markers removed.
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim_matches(|c: char| c == '*' || c == '+' || c.is_whitespace()))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn short_ref_name(full: &str) -> Option<String> {
    full.trim()
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// First line of a reversed boundary rev-list, without the boundary marker.
fn first_unique_commit(rev_list: &str) -> Option<String> {
    let first = rev_list.lines().next()?.trim().trim_start_matches('-');
    if first.is_empty() {
        None
    } else {
        debug!(event = "git.first_unique_commit", commit = first);
        Some(first.to_string())
    }
}

/// Parses `%ci` output such as `2024-05-01 14:03:22 +0200`.
pub fn parse_commit_date(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S %z")
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ReportError::InvalidDate(format!("'{}': {e}", raw.trim())))
}
