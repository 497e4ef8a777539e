use super::modified::MergeAwareCounter;
use super::output::{write_report, ChurnColumns};
use super::parse::{parse_log, ModifiedLines};
use crate::cli::CommonArgs;
use crate::git::{GitCli, GitRepo, HistoryProvider};
use crate::model::DateWindow;
use crate::util::{churn_file_name, default_start_date, today};
use anyhow::Context;
use chrono::NaiveDate;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub struct ChurnArgs {
    pub branch: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub output: Option<PathBuf>,
    pub simple: bool,
}

pub fn exec(common: CommonArgs, args: ChurnArgs) -> anyhow::Result<()> {
    let window = DateWindow::new(
        args.start_date.unwrap_or_else(default_start_date),
        args.end_date.unwrap_or_else(today),
    )
    .context("Failed to resolve date range")?;

    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let branch = match args.branch {
        Some(branch) => branch,
        None => repo
            .current_branch()
            .context("Failed to determine current branch")?,
    };

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(churn_file_name(&branch, window.start, window.end)));
    let columns = if args.simple {
        ChurnColumns::Basic
    } else {
        ChurnColumns::WithModified
    };

    let git = GitCli::new(repo.path());
    let written = run(&git, &branch, &window, columns, &path)?;

    println!(
        "{} {} commits on {} to {}",
        style("Wrote").green().bold(),
        style(written).cyan(),
        style(&branch).bold(),
        path.display()
    );
    Ok(())
}

/// Fetch, parse, count and write. Only the log fetch and the write are fatal.
pub fn run<P: HistoryProvider>(
    provider: &P,
    branch: &str,
    window: &DateWindow,
    columns: ChurnColumns,
    path: &Path,
) -> anyhow::Result<usize> {
    info!(
        "Fetching git log for branch {branch} from {} to {}",
        window.start, window.end
    );
    let log = provider
        .fetch_log(branch, window)
        .inspect_err(|e| error!(event = "churn.log_fetch_failed", error = %e, "Failed to fetch git log"))
        .context("Failed to fetch git log")?;
    info!("Successfully fetched git log.");

    let records = match columns {
        ChurnColumns::Basic => parse_log(&log, None),
        ChurnColumns::WithModified => {
            let counter = MergeAwareCounter::new(provider);
            let progress = ProgressCounter::new(&counter);
            let records = parse_log(&log, Some(&progress));
            progress.finish();
            records
        }
    };

    let written = write_report(path, records, columns).context("Failed to write churn report")?;
    Ok(written)
}

/// Ticks a spinner for every commit the inner counter handles.
struct ProgressCounter<'a> {
    inner: &'a dyn ModifiedLines,
    pb: ProgressBar,
}

impl<'a> ProgressCounter<'a> {
    fn new(inner: &'a dyn ModifiedLines) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{pos}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Counting modified lines...");
        Self { inner, pb }
    }

    fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl ModifiedLines for ProgressCounter<'_> {
    fn modified_lines(&self, commit_id: &str) -> u64 {
        let n = self.inner.modified_lines(commit_id);
        self.pb.inc(1);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReportError, Result};
    use crate::git::DiffSpec;
    use crate::model::StatLine;
    use pretty_assertions::assert_eq;

    struct ScriptedHistory {
        log: Option<String>,
    }

    impl HistoryProvider for ScriptedHistory {
        fn fetch_log(&self, _branch: &str, _window: &DateWindow) -> Result<String> {
            self.log.clone().ok_or_else(|| ReportError::CommandFailed {
                command: "git log".to_string(),
                status: "exit status: 128".to_string(),
                stderr: "fatal: bad revision 'nope'".to_string(),
            })
        }

        fn parents(&self, _commit_id: &str) -> Result<Vec<String>> {
            Ok(vec!["p".to_string()])
        }

        fn diff_stat(&self, _spec: &DiffSpec) -> Result<Vec<StatLine>> {
            Ok(vec![StatLine::parse("1\t1\tf").unwrap()])
        }
    }

    fn window() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn empty_log_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let history = ScriptedHistory {
            log: Some(String::new()),
        };

        let written = run(&history, "main", &window(), ChurnColumns::WithModified, &path).unwrap();

        assert_eq!(written, 0);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "commit_id,date,message,added_lines,removed_lines,modified_lines\n"
        );
    }

    #[test]
    fn log_fetch_failure_is_fatal_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let history = ScriptedHistory { log: None };

        assert!(run(&history, "nope", &window(), ChurnColumns::Basic, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn modified_lines_column_comes_from_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let id = "a".repeat(40);
        let history = ScriptedHistory {
            log: Some(format!("'{id},2024-02-01T00:00:00+00:00,Change'\n5\t0\tf\n")),
        };

        run(&history, "main", &window(), ChurnColumns::WithModified, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.lines().nth(1),
            Some(format!("{id},2024-02-01T00:00:00+00:00,Change,5,0,2").as_str())
        );
    }
}
