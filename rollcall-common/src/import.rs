//! Roster import from CSV and spreadsheet files
//!
//! Reading never fails from the caller's point of view: any problem produces
//! an empty (or partial) row list plus a description in
//! [`ImportReport::problem`]. The first row of every source is a header and
//! is skipped.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{info, warn};

use crate::roster::Row;

/// Rows read from a source file
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub rows: Vec<Row>,
    /// Records that could not be parsed and were left out
    pub skipped: usize,
    /// Why the source could not be read (rows is then empty)
    pub problem: Option<String>,
}

impl ImportReport {
    fn failed(problem: String) -> Self {
        Self {
            rows: Vec::new(),
            skipped: 0,
            problem: Some(problem),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.problem.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Delimited,
    Spreadsheet,
}

fn detect_format(path: &Path) -> Option<SourceFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some(SourceFormat::Delimited),
        "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(SourceFormat::Spreadsheet),
        _ => None,
    }
}

/// Read all data rows of `path`; the format is chosen by file extension
pub fn read_rows(path: &Path) -> ImportReport {
    let result = match detect_format(path) {
        Some(SourceFormat::Delimited) => read_delimited(path),
        Some(SourceFormat::Spreadsheet) => read_spreadsheet(path).map(|rows| (rows, 0)),
        None => Err(format!("Unsupported file type: {}", path.display())),
    };

    match result {
        Ok((rows, skipped)) => {
            info!(
                path = %path.display(),
                rows = rows.len(),
                skipped,
                "Read import file"
            );
            ImportReport {
                rows,
                skipped,
                problem: None,
            }
        }
        Err(problem) => {
            warn!(path = %path.display(), "Import failed: {}", problem);
            ImportReport::failed(problem)
        }
    }
}

fn read_delimited(path: &Path) -> Result<(Vec<Row>, usize), String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("Error reading CSV file: {}", e))?;

    let mut rows = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        match record {
            Ok(record) => {
                let row: Row = record.iter().map(str::to_string).collect();
                if !row.iter().all(|f| f.trim().is_empty()) {
                    rows.push(row);
                }
            }
            Err(e) => {
                warn!("Skipping bad CSV record: {}", e);
                skipped += 1;
            }
        }
    }
    Ok((rows, skipped))
}

fn read_spreadsheet(path: &Path) -> Result<Vec<Row>, String> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| format!("Error reading spreadsheet: {}", e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "No sheets found in spreadsheet".to_string())?
        .map_err(|e| format!("Error reading worksheet: {}", e))?;

    Ok(range
        .rows()
        .skip(1)
        .map(|cells| cells.iter().map(cell_to_string).collect::<Row>())
        .filter(|row| !row.iter().all(|f| f.trim().is_empty()))
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        // Serial dates and error cells carry no roster meaning
        _ => String::new(),
    }
}

/// Whole floats (spreadsheet ages are often stored as 42.0) print without fraction
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}
