use crate::error::Result;
use std::fs::File;
use std::path::Path;
use tracing::{error, info};

/// Creates (or truncates) `path` and hands a CSV writer to `fill`.
///
/// Any failure is logged and returned; a partially written file is left as is.
pub fn write_csv<F>(path: &Path, what: &str, fill: F) -> Result<()>
where
    F: FnOnce(&mut csv::Writer<File>) -> Result<()>,
{
    info!("Saving {what} to {}", path.display());

    let result: Result<()> = File::create(path)
        .map_err(Into::into)
        .and_then(|file| {
            let mut writer = csv::Writer::from_writer(file);
            fill(&mut writer)?;
            writer.flush()?;
            Ok(())
        });

    match &result {
        Ok(()) => info!("Data successfully saved to {}", path.display()),
        Err(e) => error!(event = "report.write_failed", path = %path.display(), error = %e, "Error saving data to CSV"),
    }
    result
}
