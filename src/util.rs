use chrono::{Duration, Local, NaiveDate};
use std::path::Path;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 180;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn default_start_date() -> NaiveDate {
    today() - Duration::days(DEFAULT_LOOKBACK_DAYS)
}

pub fn parse_iso_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{input}': {e}"))
}

/// Keeps a branch name usable as a single file-name component.
pub fn file_component(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

pub fn churn_file_name(branch: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}_{}_{}_commit_churn.csv",
        file_component(branch),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

pub fn branch_report_file_name(repo_path: &Path, start: NaiveDate, end: NaiveDate) -> String {
    let repo_name = repo_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "repository".to_string());
    format!(
        "{}_{}_{}.csv",
        file_component(&repo_name),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// First whitespace-delimited token after the first `#` in a commit message.
pub fn issue_ref(message: &str) -> Option<String> {
    let (_, rest) = message.split_once('#')?;
    rest.split_whitespace().next().map(str::to_string)
}

pub fn looks_like_object_id(id: &str) -> bool {
    matches!(id.len(), 40 | 64) && id.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn churn_file_name_flattens_branch_paths() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(
            churn_file_name("feature/login", start, end),
            "feature_login_2024-01-01_2024-06-30_commit_churn.csv"
        );
        assert_eq!(
            branch_report_file_name(Path::new("/work/gmetrics"), start, end),
            "gmetrics_2024-01-01_2024-06-30.csv"
        );
    }

    #[test]
    fn issue_ref_takes_first_token_after_hash() {
        assert_eq!(issue_ref("Fix crash #1234 in parser"), Some("1234".to_string()));
        assert_eq!(issue_ref("Refs #  42 and #43"), Some("42".to_string()));
        assert_eq!(issue_ref("No reference here"), None);
        assert_eq!(issue_ref("Dangling #"), None);
        assert_eq!(issue_ref("Dangling #   "), None);
    }

    #[test]
    fn object_id_shape() {
        assert!(looks_like_object_id(&"a".repeat(40)));
        assert!(looks_like_object_id(&"0f".repeat(32)));
        assert!(!looks_like_object_id("abc123"));
        assert!(!looks_like_object_id(&"z".repeat(40)));
    }

    #[test]
    fn parse_iso_date_rejects_other_formats() {
        assert_eq!(
            parse_iso_date("2024-02-29"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert!(parse_iso_date("29/02/2024").is_err());
    }
}
