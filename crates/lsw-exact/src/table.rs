//! Two-column CSV tables: exact free-energy sweeps and sampled densities.

use std::fs::File;
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, Trim, WriterBuilder};
use lsw_core::errors::{ErrorInfo, LswError};
use lsw_core::PotentialKind;
use tempfile::NamedTempFile;

use crate::sweep::SweepPoint;

/// Header of an exact table. The second column keeps the leading space of
/// the `", "` separator the tables have always used.
pub const EXACT_TABLE_HEADER: [&str; 2] = ["Temperature", " Energy Diff"];

const DENSITY_TABLE_HEADER: [&str; 2] = ["x", " density"];

fn io_error(code: &str, err: impl ToString, path: &Path) -> LswError {
    LswError::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}

fn csv_error(code: &str, err: impl ToString, path: &Path) -> LswError {
    LswError::Serde(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}

/// Shortest decimal that reads back to the same `f64` (`0.30000000000000004`, `1.0`).
pub fn format_scalar(value: f64) -> String {
    format!("{value:?}")
}

/// Conventional file name of the exact table of a potential.
pub fn exact_table_file_name(kind: PotentialKind) -> String {
    format!("{}_exact.csv", kind.name())
}

fn write_rows<I>(path: &Path, header: [&str; 2], rows: I) -> Result<usize, LswError>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| io_error("table_tmp", err, path))?;
    let mut count = 0;
    {
        let mut wtr = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .from_writer(&mut tmp);
        wtr.write_record(header)
            .map_err(|err| csv_error("table_write", err, path))?;
        for (a, b) in rows {
            wtr.write_record([format_scalar(a), format!(" {}", format_scalar(b))])
                .map_err(|err| csv_error("table_write", err, path))?;
            count += 1;
        }
        wtr.flush().map_err(|err| io_error("table_flush", err, path))?;
    }
    tmp.as_file_mut()
        .sync_all()
        .map_err(|err| io_error("table_sync", err, path))?;
    tmp.persist(path)
        .map_err(|err| io_error("table_persist", err.error, path))?;
    Ok(count)
}

/// Writes an exact table and returns the number of data rows.
///
/// Every point is evaluated before the file is touched; if any point is an
/// error nothing is written and the error is returned. The table is written
/// to a temporary sibling and renamed into place.
pub fn write_exact_table<I>(path: &Path, points: I) -> Result<usize, LswError>
where
    I: IntoIterator<Item = Result<SweepPoint, LswError>>,
{
    let points: Vec<SweepPoint> = points.into_iter().collect::<Result<_, _>>()?;
    write_rows(
        path,
        EXACT_TABLE_HEADER,
        points.iter().map(|p| (p.kt, p.energy_diff)),
    )
}

/// Writes sampled `(x, density)` pairs.
pub fn write_density_table(path: &Path, samples: &[(f64, f64)]) -> Result<usize, LswError> {
    write_rows(path, DENSITY_TABLE_HEADER, samples.iter().copied())
}

/// Reads an exact table written by [`write_exact_table`] or by the legacy
/// scripts.
pub fn read_exact_table(path: &Path) -> Result<Vec<SweepPoint>, LswError> {
    let file = File::open(path).map_err(|err| io_error("table_open", err, path))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);
    let mut points = Vec::new();
    for record in rdr.deserialize::<(f64, f64)>() {
        let (kt, energy_diff) = record.map_err(|err| csv_error("table_read", err, path))?;
        points.push(SweepPoint { kt, energy_diff });
    }
    Ok(points)
}
