use crate::error::Result;
use crate::model::{CommitMetric, PullRequestMetric};
use crate::report::write_csv;
use std::io::Write;
use std::path::Path;

pub const PR_HEADER: [&str; 7] = [
    "pr_id",
    "title",
    "status",
    "created_date",
    "completed_date",
    "lead_time_hours",
    "reviewers",
];

fn pr_row(metric: &PullRequestMetric) -> [String; 7] {
    [
        metric.pr_id.to_string(),
        metric.title.clone(),
        metric.status.clone(),
        metric.created_date.to_rfc3339(),
        metric
            .completed_date
            .map(|d| d.to_rfc3339())
            .unwrap_or_default(),
        metric
            .lead_time_hours
            .map(|h| format!("{h:.2}"))
            .unwrap_or_default(),
        metric.reviewers.join("; "),
    ]
}

pub fn write_pr_records<W: Write>(writer: &mut csv::Writer<W>, metrics: &[PullRequestMetric]) -> Result<()> {
    writer.write_record(PR_HEADER)?;
    for metric in metrics {
        writer.write_record(pr_row(metric))?;
    }
    Ok(())
}

pub fn write_pr_report(path: &Path, metrics: &[PullRequestMetric]) -> Result<()> {
    write_csv(path, "pull request metrics", |writer| write_pr_records(writer, metrics))
}

pub fn write_commit_report(path: &Path, metrics: &[CommitMetric]) -> Result<()> {
    write_csv(path, "git metrics", |writer| {
        if metrics.is_empty() {
            writer.write_record(["branch", "commit_date", "author", "message", "issue_ref"])?;
        }
        for metric in metrics {
            writer.serialize(metric)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn pr_rows_join_reviewers_and_round_hours() {
        let metric = PullRequestMetric {
            pr_id: 5,
            title: "Fix, then ship".to_string(),
            status: "completed".to_string(),
            created_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            completed_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 20, 0).unwrap()),
            lead_time_hours: Some(1.0 / 3.0),
            reviewers: vec!["Ada".to_string(), "Lin".to_string()],
        };
        let mut writer = csv::Writer::from_writer(Vec::new());
        write_pr_records(&mut writer, &[metric]).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(
            text.lines().nth(1),
            Some("5,\"Fix, then ship\",completed,2024-01-01T00:00:00+00:00,2024-01-01T00:20:00+00:00,0.33,Ada; Lin")
        );
    }

    #[test]
    fn commit_report_has_header_even_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("git.csv");
        write_commit_report(&path, &[]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "branch,commit_date,author,message,issue_ref\n"
        );
    }

    #[test]
    fn commit_report_serializes_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("git.csv");
        let metric = CommitMetric {
            branch: "main".to_string(),
            commit_date: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            author: "Ada".to_string(),
            message: "Fix #12".to_string(),
            issue_ref: Some("12".to_string()),
        };
        write_commit_report(&path, &[metric]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "branch,commit_date,author,message,issue_ref");
        assert_eq!(lines[1], "main,2024-01-02T03:04:05Z,Ada,Fix #12,12");
    }
}
