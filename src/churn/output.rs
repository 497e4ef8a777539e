use crate::error::Result;
use crate::model::CommitRecord;
use crate::report::write_csv;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChurnColumns {
    /// `commit_id, date, message, added_lines, removed_lines`
    Basic,
    /// Basic columns plus `modified_lines`.
    WithModified,
}

impl ChurnColumns {
    pub fn header(self) -> &'static [&'static str] {
        match self {
            ChurnColumns::Basic => &["commit_id", "date", "message", "added_lines", "removed_lines"],
            ChurnColumns::WithModified => &[
                "commit_id",
                "date",
                "message",
                "added_lines",
                "removed_lines",
                "modified_lines",
            ],
        }
    }

    fn row(self, record: &CommitRecord) -> Vec<String> {
        let mut row = vec![
            record.commit_id.clone(),
            record.date.clone(),
            record.message.clone(),
            record.added_lines.to_string(),
            record.removed_lines.to_string(),
        ];
        if self == ChurnColumns::WithModified {
            row.push(record.modified_lines.unwrap_or_default().to_string());
        }
        row
    }
}

fn parsed_date(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Oldest first. ISO dates compare as instants so mixed offsets order
/// correctly. Dates that do not parse as RFC 3339 all sort ahead of the
/// parsed ones, in text order among themselves.
pub fn sort_by_date(records: &mut [CommitRecord]) {
    records.sort_by_cached_key(|r| (parsed_date(&r.date), r.date.clone()));
}

pub fn write_records<W: Write>(
    writer: &mut csv::Writer<W>,
    records: &[CommitRecord],
    columns: ChurnColumns,
) -> Result<()> {
    writer.write_record(columns.header())?;
    for record in records {
        writer.write_record(columns.row(record))?;
    }
    Ok(())
}

/// Sorts `records` and writes them to `path`, returning the number of rows.
pub fn write_report(path: &Path, mut records: Vec<CommitRecord>, columns: ChurnColumns) -> Result<usize> {
    sort_by_date(&mut records);
    write_csv(path, "commit data", |writer| {
        write_records(writer, &records, columns)
    })?;
    Ok(records.len())
}
