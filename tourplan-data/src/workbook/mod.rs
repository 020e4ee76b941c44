//! Spreadsheet reader for planner workbooks.
//!
//! A workbook carries two sheets:
//!
//! - `plan`: one job per row with columns `job_id`, `job_type`, `job_start`,
//!   `job_end`, `job_duration`, `job_lat`, `job_lng` and `job_demand`.
//! - `fleet`: the depot, with columns `shift_start_lat`, `shift_start_lng`,
//!   `shift_end_lat` and `shift_end_lng`. Only the first data row is used.
//!
//! Columns are located by header name, so their order does not matter and
//! extra columns are ignored. Blank rows are skipped.

mod cell;

use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use thiserror::Error;
use tourplan_core::{FleetRow, JobRow, Location};

/// Name of the sheet listing jobs.
pub const PLAN_SHEET: &str = "plan";
/// Name of the sheet describing the fleet.
pub const FLEET_SHEET: &str = "fleet";

const PLAN_COLUMNS: [&str; 8] = [
    "job_id",
    "job_type",
    "job_start",
    "job_end",
    "job_duration",
    "job_lat",
    "job_lng",
    "job_demand",
];

const FLEET_COLUMNS: [&str; 4] = [
    "shift_start_lat",
    "shift_start_lng",
    "shift_end_lat",
    "shift_end_lng",
];

static EMPTY: Data = Data::Empty;

/// Errors raised while reading a workbook.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// The file could not be opened or is not a spreadsheet.
    #[error("failed to open workbook {path}: {source}")]
    Open {
        /// Workbook path.
        path: String,
        /// Underlying reader error.
        #[source]
        source: Box<calamine::Error>,
    },
    /// A required sheet is absent.
    #[error("workbook has no sheet named `{sheet}`")]
    MissingSheet {
        /// Sheet name.
        sheet: &'static str,
    },
    /// A sheet exists but could not be decoded.
    #[error("failed to read sheet `{sheet}`: {source}")]
    Sheet {
        /// Sheet name.
        sheet: &'static str,
        /// Underlying reader error.
        #[source]
        source: Box<calamine::Error>,
    },
    /// A required column header is absent.
    #[error("sheet `{sheet}` has no column `{column}`")]
    MissingColumn {
        /// Sheet name.
        sheet: &'static str,
        /// Column header.
        column: &'static str,
    },
    /// A cell holds a value of the wrong kind.
    #[error("sheet `{sheet}` row {row} column `{column}`: {message}")]
    InvalidCell {
        /// Sheet name.
        sheet: &'static str,
        /// One-based spreadsheet row number.
        row: usize,
        /// Column header.
        column: &'static str,
        /// What was wrong with the value.
        message: String,
    },
    /// The fleet sheet has a header but no data row.
    #[error("sheet `fleet` contains no depot row")]
    EmptyFleet,
}

/// Rows read from a workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    /// Jobs in sheet order.
    pub jobs: Vec<JobRow>,
    /// The single fleet descriptor.
    pub fleet: FleetRow,
}

/// Read the `plan` and `fleet` sheets of the workbook at `path`.
///
/// `.xlsx`, `.xlsm`, `.xls` and `.ods` files are supported.
///
/// # Errors
///
/// Returns [`WorkbookError`] when the file cannot be opened, a sheet or
/// column is missing, or a cell cannot be converted.
pub fn read_workbook(path: impl AsRef<Path>) -> Result<WorkbookData, WorkbookError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
        path: path.display().to_string(),
        source: Box::new(source),
    })?;
    let names = workbook.sheet_names();
    let mut sheet = |name: &'static str| {
        if !names.iter().any(|candidate| candidate == name) {
            return Err(WorkbookError::MissingSheet { sheet: name });
        }
        workbook
            .worksheet_range(name)
            .map_err(|source| WorkbookError::Sheet {
                sheet: name,
                source: Box::new(source),
            })
    };
    let plan = sheet(PLAN_SHEET)?;
    let fleet = sheet(FLEET_SHEET)?;
    let data = WorkbookData {
        jobs: jobs_from_range(&plan)?,
        fleet: fleet_from_range(&fleet)?,
    };
    log::debug!("read {} jobs from {}", data.jobs.len(), path.display());
    Ok(data)
}

/// Convert the `plan` sheet into job rows.
///
/// # Errors
///
/// Returns [`WorkbookError::MissingColumn`] or
/// [`WorkbookError::InvalidCell`].
pub fn jobs_from_range(range: &Range<Data>) -> Result<Vec<JobRow>, WorkbookError> {
    let table = Table::new(PLAN_SHEET, range, &PLAN_COLUMNS)?;
    table
        .rows()
        .map(|row| -> Result<JobRow, WorkbookError> {
            Ok(JobRow {
                id: row.read("job_id", cell::text)?,
                job_type: row.read("job_type", cell::text)?,
                start: row.read("job_start", cell::time_of_day)?,
                end: row.read("job_end", cell::time_of_day)?,
                duration: row.read("job_duration", cell::whole)?,
                location: Location::new(
                    row.read("job_lat", cell::number)?,
                    row.read("job_lng", cell::number)?,
                ),
                demand: row.read("job_demand", |value| {
                    let demand = cell::whole(value)?;
                    u32::try_from(demand).map_err(|_| format!("demand {demand} is too large"))
                })?,
            })
        })
        .collect()
}

/// Convert the first data row of the `fleet` sheet into a fleet descriptor.
///
/// # Errors
///
/// Returns [`WorkbookError::MissingColumn`],
/// [`WorkbookError::InvalidCell`] or [`WorkbookError::EmptyFleet`].
pub fn fleet_from_range(range: &Range<Data>) -> Result<FleetRow, WorkbookError> {
    let table = Table::new(FLEET_SHEET, range, &FLEET_COLUMNS)?;
    let mut rows = table.rows();
    let row = rows.next().ok_or(WorkbookError::EmptyFleet)?;
    let extra = rows.count();
    if extra > 0 {
        log::warn!("sheet `fleet` has {extra} more rows; only the first is used");
    }
    Ok(FleetRow {
        shift_start: Location::new(
            row.read("shift_start_lat", cell::number)?,
            row.read("shift_start_lng", cell::number)?,
        ),
        shift_end: Location::new(
            row.read("shift_end_lat", cell::number)?,
            row.read("shift_end_lng", cell::number)?,
        ),
    })
}

/// A sheet with its header row resolved to column positions.
struct Table<'a> {
    sheet: &'static str,
    range: &'a Range<Data>,
    columns: HashMap<&'static str, usize>,
    first_row: usize,
}

impl<'a> Table<'a> {
    fn new(
        sheet: &'static str,
        range: &'a Range<Data>,
        required: &[&'static str],
    ) -> Result<Self, WorkbookError> {
        let header = range.rows().next().unwrap_or_default();
        let positions: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .filter_map(|(index, value)| match value {
                Data::String(name) => Some((name.trim().to_owned(), index)),
                _ => None,
            })
            .collect();
        let columns = required
            .iter()
            .map(|&column| {
                positions
                    .get(column)
                    .map(|&index| (column, index))
                    .ok_or(WorkbookError::MissingColumn { sheet, column })
            })
            .collect::<Result<_, _>>()?;
        let first_row = range
            .start()
            .and_then(|(row, _)| usize::try_from(row).ok())
            .unwrap_or_default();
        Ok(Self {
            sheet,
            range,
            columns,
            first_row,
        })
    }

    /// Non-blank data rows below the header.
    fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.range
            .rows()
            .enumerate()
            .skip(1)
            .filter(|(_, cells)| !cells.iter().all(cell::is_blank))
            .map(|(offset, cells)| TableRow {
                table: self,
                cells,
                number: self.first_row + offset + 1,
            })
    }
}

struct TableRow<'a> {
    table: &'a Table<'a>,
    cells: &'a [Data],
    number: usize,
}

impl TableRow<'_> {
    fn read<T>(
        &self,
        column: &'static str,
        convert: impl FnOnce(&Data) -> Result<T, String>,
    ) -> Result<T, WorkbookError> {
        let value = self
            .table
            .columns
            .get(column)
            .and_then(|&index| self.cells.get(index))
            .unwrap_or(&EMPTY);
        convert(value).map_err(|message| WorkbookError::InvalidCell {
            sheet: self.table.sheet,
            row: self.number,
            column,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn sheet(rows: &[Vec<Data>]) -> Range<Data> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(1);
        let height = rows.len().max(1);
        let mut range = Range::new(
            (0, 0),
            (
                u32::try_from(height - 1).expect("small sheet"),
                u32::try_from(width - 1).expect("small sheet"),
            ),
        );
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                range.set_value(
                    (
                        u32::try_from(r).expect("small sheet"),
                        u32::try_from(c).expect("small sheet"),
                    ),
                    value.clone(),
                );
            }
        }
        range
    }

    fn header(names: &[&str]) -> Vec<Data> {
        names.iter().map(|name| Data::String((*name).to_owned())).collect()
    }

    #[fixture]
    fn plan() -> Vec<Vec<Data>> {
        vec![
            header(&PLAN_COLUMNS),
            vec![
                Data::Float(1.0),
                Data::String("delivery".to_owned()),
                Data::String("08:00:00".to_owned()),
                Data::Float(0.375),
                Data::Float(600.0),
                Data::Float(52.0),
                Data::Float(5.0),
                Data::Float(3.0),
            ],
            vec![Data::Empty; 8],
            vec![
                Data::String("job_2".to_owned()),
                Data::String("pickup".to_owned()),
                Data::String("10:00:00".to_owned()),
                Data::String("12:00:00".to_owned()),
                Data::Int(300),
                Data::String("52.2".to_owned()),
                Data::Float(5.2),
                Data::Int(1),
            ],
        ]
    }

    #[rstest]
    fn plan_rows_are_converted(plan: Vec<Vec<Data>>) {
        let jobs = jobs_from_range(&sheet(&plan)).expect("plan reads");
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[0],
            JobRow::delivery("1", Location::new(52.0, 5.0), 3)
                .with_window("08:00:00", "09:00:00")
                .with_duration(600)
        );
        assert_eq!(jobs[1].id, "job_2");
        assert_eq!(jobs[1].job_type, "pickup");
        assert_eq!(jobs[1].location, Location::new(52.2, 5.2));
    }

    #[rstest]
    fn columns_are_found_by_name(plan: Vec<Vec<Data>>) {
        let reversed: Vec<Vec<Data>> = plan
            .into_iter()
            .map(|row| row.into_iter().rev().collect())
            .collect();
        let jobs = jobs_from_range(&sheet(&reversed)).expect("plan reads");
        assert_eq!(jobs[0].demand, 3);
        assert_eq!(jobs[0].id, "1");
    }

    #[rstest]
    fn missing_column_is_named(mut plan: Vec<Vec<Data>>) {
        plan[0][7] = Data::String("demand".to_owned());
        let err = jobs_from_range(&sheet(&plan)).expect_err("column missing");
        assert!(matches!(
            err,
            WorkbookError::MissingColumn {
                sheet: "plan",
                column: "job_demand"
            }
        ));
    }

    #[rstest]
    fn invalid_cell_reports_position(mut plan: Vec<Vec<Data>>) {
        plan[3][5] = Data::String("north".to_owned());
        let err = jobs_from_range(&sheet(&plan)).expect_err("bad latitude");
        match err {
            WorkbookError::InvalidCell { sheet, row, column, .. } => {
                assert_eq!(sheet, "plan");
                assert_eq!(row, 4);
                assert_eq!(column, "job_lat");
            }
            other => panic!("expected InvalidCell, found {other:?}"),
        }
    }

    #[rstest]
    fn numeric_time_beyond_one_day_is_an_invalid_cell(mut plan: Vec<Vec<Data>>) {
        plan[1][3] = Data::Float(9.5);
        let err = jobs_from_range(&sheet(&plan)).expect_err("time spans days");
        match err {
            WorkbookError::InvalidCell { row, column, message, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "job_end");
                assert!(message.contains("9.5"), "message: {message}");
            }
            other => panic!("expected InvalidCell, found {other:?}"),
        }
    }

    #[rstest]
    fn fleet_uses_first_row() {
        let rows = vec![
            header(&FLEET_COLUMNS),
            vec![
                Data::Float(52.1),
                Data::Float(5.1),
                Data::Float(52.3),
                Data::Float(5.3),
            ],
            vec![Data::Float(0.0); 4],
        ];
        let fleet = fleet_from_range(&sheet(&rows)).expect("fleet reads");
        assert_eq!(fleet.shift_start, Location::new(52.1, 5.1));
        assert_eq!(fleet.shift_end, Location::new(52.3, 5.3));
    }

    #[rstest]
    fn fleet_without_rows_is_rejected() {
        let rows = vec![header(&FLEET_COLUMNS)];
        assert!(matches!(
            fleet_from_range(&sheet(&rows)),
            Err(WorkbookError::EmptyFleet)
        ));
    }

    #[rstest]
    fn unreadable_file_is_an_open_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("plan.xlsx");
        std::fs::write(&path, b"not a workbook").expect("write file");
        assert!(matches!(
            read_workbook(&path),
            Err(WorkbookError::Open { .. })
        ));
    }
}
