use crate::error::Result;
use crate::model::BranchRecord;
use crate::report::write_csv;
use std::io::Write;
use std::path::Path;

pub const HEADER: [&str; 5] = ["Branch", "Parent", "Created (UTC)", "Age (days)", "Merged"];

const NOT_AVAILABLE: &str = "N/A";

fn row(record: &BranchRecord) -> [String; 5] {
    [
        record.branch.clone(),
        record.parent.clone().unwrap_or_else(|| "Unknown".to_string()),
        record
            .created
            .map(|c| c.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        record
            .age_days
            .map(|d| d.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        if record.merged { "True" } else { "False" }.to_string(),
    ]
}

pub fn write_records<W: Write>(writer: &mut csv::Writer<W>, records: &[BranchRecord]) -> Result<()> {
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(row(record))?;
    }
    Ok(())
}

pub fn write_report(path: &Path, records: &[BranchRecord]) -> Result<usize> {
    write_csv(path, "branch analysis", |writer| write_records(writer, records))?;
    Ok(records.len())
}
