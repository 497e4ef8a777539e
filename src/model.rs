use crate::error::{ReportError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Value used in place of a count that could not be parsed.
pub const FALLBACK_COUNT: u64 = 0;

/// Outcome of reading one numeric field of a stat line.
///
/// Binary files are reported with `-` placeholders; those (and any other
/// non-numeric text) become `Unparsed` and contribute [`FALLBACK_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCount {
    Counted(u64),
    Unparsed,
}

impl LineCount {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u64>() {
            Ok(n) => LineCount::Counted(n),
            Err(_) => LineCount::Unparsed,
        }
    }

    pub fn value(self) -> u64 {
        match self {
            LineCount::Counted(n) => n,
            LineCount::Unparsed => FALLBACK_COUNT,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, LineCount::Unparsed)
    }
}

/// One `added\tremoved\tpath` line of a numeric diff summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub added: LineCount,
    pub removed: LineCount,
    pub path: String,
}

impl StatLine {
    /// Returns `None` unless the line has exactly three tab-separated fields.
    pub fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split('\t').collect();
        match parts.as_slice() {
            [added, removed, path] => Some(Self {
                added: LineCount::parse(added),
                removed: LineCount::parse(removed),
                path: (*path).to_string(),
            }),
            _ => None,
        }
    }

    pub fn has_fallback(&self) -> bool {
        self.added.is_fallback() || self.removed.is_fallback()
    }

    /// Added plus removed, saturating at `u64::MAX`.
    pub fn churn(&self) -> u64 {
        self.added.value().saturating_add(self.removed.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub commit_id: String,
    pub date: String,
    pub message: String,
    pub added_lines: u64,
    pub removed_lines: u64,
    #[serde(default)]
    pub modified_lines: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRecord {
    pub branch: String,
    pub parent: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub age_days: Option<i64>,
    pub merged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitMetric {
    pub branch: String,
    pub commit_date: DateTime<Utc>,
    pub author: String,
    pub message: String,
    pub issue_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestMetric {
    pub pr_id: i64,
    pub title: String,
    pub status: String,
    pub created_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub lead_time_hours: Option<f64>,
    pub reviewers: Vec<String>,
}

/// Inclusive calendar-day window used by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ReportError::InvalidDate(format!(
                "Invalid range: start ({start}) is after end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn since_arg(&self) -> String {
        format!("{} 00:00:00", self.start.format("%Y-%m-%d"))
    }

    pub fn until_arg(&self) -> String {
        format!("{} 23:59:59", self.end.format("%Y-%m-%d"))
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        day >= self.start && day <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn stat_line_requires_three_fields() {
        assert_eq!(StatLine::parse("1\t2"), None);
        assert_eq!(StatLine::parse("1\t2\ta.rs\textra"), None);
        assert_eq!(StatLine::parse(""), None);

        let line = StatLine::parse("3\t4\tsrc/lib.rs").unwrap();
        assert_eq!(line.added, LineCount::Counted(3));
        assert_eq!(line.removed, LineCount::Counted(4));
        assert_eq!(line.path, "src/lib.rs");
        assert_eq!(line.churn(), 7);
    }

    #[test]
    fn binary_placeholders_fall_back_to_zero() {
        let line = StatLine::parse("-\t-\tlogo.png").unwrap();
        assert!(line.added.is_fallback());
        assert!(line.removed.is_fallback());
        assert_eq!(line.churn(), 0);

        let line = StatLine::parse("abc\tdef\tfile.txt").unwrap();
        assert_eq!(line.added.value(), FALLBACK_COUNT);
        assert_eq!(line.removed.value(), FALLBACK_COUNT);
    }

    #[test]
    fn churn_saturates_instead_of_overflowing() {
        let line = StatLine::parse(&format!("{}\t1\thuge.txt", u64::MAX)).unwrap();
        assert!(!line.has_fallback());
        assert_eq!(line.churn(), u64::MAX);
    }

    #[test]
    fn date_window_rejects_reversed_range() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(DateWindow::new(start, end).is_err());
    }

    #[test]
    fn date_window_includes_whole_end_day() {
        let window = DateWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 31, 22, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 1).unwrap();
        let before = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert!(window.contains(&late));
        assert!(!window.contains(&after));
        assert!(!window.contains(&before));
        assert_eq!(window.since_arg(), "2024-01-01 00:00:00");
        assert_eq!(window.until_arg(), "2024-01-31 23:59:59");
    }
}
