use crate::error::{Error, Result};
use crate::results::ResultSet;
use std::io::Write;
use std::path::Path;

/// Column order of the output table
pub const COLUMNS: [&str; 7] = [
    "name",
    "price",
    "seller",
    "location",
    "category",
    "url",
    "scraped_at",
];

/// Write the result set as CSV. The header is always written, even with no rows.
pub fn write_csv<W: Write>(results: &ResultSet, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for record in results {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Persist the result set to `path`, creating parent directories.
///
/// Rows are serialized into memory before the file is touched.
pub fn save_csv(results: &ResultSet, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    write_csv(results, &mut buf)?;

    let io_err = |source| Error::OutputIo {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, buf).map_err(io_err)?;

    ::log::info!("Saved {} listings to {}", results.len(), path.display());
    Ok(())
}
