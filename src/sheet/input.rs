use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use tracing::{debug, info};

use crate::{
    error::{Result, VerifyError},
    verify::{EligibilitySet, Record},
};

pub const COMPANY_COLUMN: &str = "기업명";
pub const ADDRESS_COLUMN: &str = "주소";
pub const BRANCH_COLUMN: &str = "분지점";
pub const ELECTRONIC_COLUMN: &str = "전자조회가능회사";

const UTF8_BOM: char = '\u{feff}';

/// Records and eligibility names parsed from one uploaded table
#[derive(Debug, Clone)]
pub struct InputTable {
    pub records: Vec<Record>,
    pub eligibility: EligibilitySet,
    /// Data rows dropped for having no company name
    pub skipped_rows: usize,
}

/// Load the first worksheet of a workbook, or a CSV file.
pub fn load_input(path: &Path) -> Result<InputTable> {
    let (header_row, rows) = match extension(path).as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook(path)?,
        other => {
            return Err(VerifyError::UnsupportedFormat(format!(
                "cannot read '{}' input files (expected xlsx, xls, ods or csv)",
                other
            )))
        }
    };

    let table = InputTable::from_rows(header_row, rows)?;
    info!(
        "Loaded {} records from {} ({} rows without company name skipped, {} electronic-eligible names)",
        table.records.len(),
        path.display(),
        table.skipped_rows,
        table.eligibility.len()
    );
    Ok(table)
}

impl InputTable {
    /// Build from raw text rows. The first row is the header and sits at
    /// spreadsheet row `header_row` (1-based).
    pub fn from_rows(header_row: usize, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut rows = rows.into_iter();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| VerifyError::Input("the table is empty (no header row)".to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let column = |name: &str| headers.iter().position(|h| h == name);
        let required = |name: &str| {
            column(name).ok_or_else(|| {
                VerifyError::Input(format!(
                    "missing required column '{}' (found: {})",
                    name,
                    headers.join(", ")
                ))
            })
        };

        let company_col = required(COMPANY_COLUMN)?;
        let address_col = required(ADDRESS_COLUMN)?;
        let branch_col = column(BRANCH_COLUMN);
        let electronic_col = column(ELECTRONIC_COLUMN);
        debug!(
            "Columns: company={} address={} branch={:?} electronic={:?}",
            company_col, address_col, branch_col, electronic_col
        );

        let cell = |row: &[String], col: Option<usize>| -> String {
            col.and_then(|c| row.get(c))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let mut records = Vec::new();
        let mut electronic_names = Vec::new();
        let mut skipped_rows = 0;

        for (offset, row) in rows.enumerate() {
            // eligibility names are listed independently of the company rows
            let electronic = cell(&row, electronic_col);
            if !electronic.is_empty() {
                electronic_names.push(electronic);
            }

            let company = cell(&row, Some(company_col));
            if company.is_empty() {
                skipped_rows += 1;
                continue;
            }

            records.push(Record::new(
                header_row + offset + 1,
                &company,
                &cell(&row, branch_col),
                &cell(&row, Some(address_col)),
            ));
        }

        Ok(Self {
            records,
            eligibility: EligibilitySet::new(electronic_names),
            skipped_rows,
        })
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

fn read_workbook(path: &Path) -> Result<(usize, Vec<Vec<String>>)> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| VerifyError::Input("workbook contains no sheets".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    // data may not begin at A1
    let header_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok((header_row, rows))
}

fn read_csv(path: &Path) -> Result<(usize, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    // Excel writes a BOM in front of UTF-8 CSV exports
    if let Some(first) = rows.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix(UTF8_BOM) {
            *first = stripped.to_string();
        }
    }

    Ok((1, rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(n) => {
            // integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => datetime_text(dt),
        Data::Error(e) => format!("#{:?}", e),
    }
}

/// Render a date-typed cell the way it is shown in the sheet rather than as
/// its serial number.
fn datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        let seconds = (dt.as_f64() * 86_400.0).round() as i64;
        return format!("{}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    }

    let (year, month, day, hour, min, sec, _) = dt.to_ymd_hms_milli();
    if hour == 0 && min == 0 && sec == 0 {
        format!("{:04}-{:02}-{:02}", year, month, day)
    } else {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hour, min, sec
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTimeType;
    use std::io::Write;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_headers_are_trimmed() {
        let table = InputTable::from_rows(
            1,
            vec![
                row(&[" 기업명 ", "분지점", " 주소"]),
                row(&["ABC상사", "강남지점", "서울특별시 강남구 테헤란로 1"]),
            ],
        )
        .unwrap();

        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0], Record::new(2, "ABC상사", "강남지점", "서울특별시 강남구 테헤란로 1"));
        assert!(table.eligibility.is_empty());
    }

    #[test]
    fn test_missing_address_column() {
        let err = InputTable::from_rows(1, vec![row(&["기업명", "분지점"]), row(&["ABC상사", ""])])
            .unwrap_err();
        match err {
            VerifyError::Input(msg) => assert!(msg.contains(ADDRESS_COLUMN)),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_table() {
        assert!(matches!(
            InputTable::from_rows(1, Vec::new()),
            Err(VerifyError::Input(_))
        ));
    }

    #[test]
    fn test_rows_without_company_are_skipped() {
        let table = InputTable::from_rows(
            1,
            vec![
                row(&["기업명", "주소", "전자조회가능회사"]),
                row(&["ABC상사", "서울 강남구", "ABC상사"]),
                row(&["", "서울 중구", "XYZ물산"]),
                row(&["  ", "", "ABC상사"]),
                // short row
                row(&["DEF산업"]),
            ],
        )
        .unwrap();

        let names: Vec<&str> = table.records.iter().map(|r| r.company_name.as_str()).collect();
        assert_eq!(names, vec!["ABC상사", "DEF산업"]);
        assert_eq!(table.records[1].row_number, 5);
        assert_eq!(table.records[1].ledger_address, "");
        assert_eq!(table.records[1].branch_name, "");
        assert_eq!(table.skipped_rows, 2);
        assert_eq!(table.eligibility.names(), &["ABC상사".to_string(), "XYZ물산".to_string()]);
    }

    #[test]
    fn test_load_csv_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "\u{feff}기업명,분지점,주소\nABC상사,,서울특별시 강남구 테헤란로 1\n,,\n"
        )
        .unwrap();

        let table = load_input(&path).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].company_name, "ABC상사");
        assert_eq!(table.records[0].ledger_address, "서울특별시 강남구 테헤란로 1");
    }

    #[test]
    fn test_load_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "기업명").unwrap();
        sheet.write_string(0, 1, "주소").unwrap();
        sheet.write_string(0, 2, "전자조회가능회사").unwrap();
        sheet.write_string(1, 0, "ABC상사").unwrap();
        sheet.write_string(1, 1, "서울특별시 강남구 테헤란로 1").unwrap();
        sheet.write_string(1, 2, "ABC").unwrap();
        sheet.write_number(2, 0, 1234.0).unwrap();
        sheet.write_string(2, 1, "부산광역시 해운대구").unwrap();
        workbook.save(&path).unwrap();

        let table = load_input(&path).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1].company_name, "1234");
        assert_eq!(table.records[1].row_number, 3);
        assert!(table.eligibility.is_eligible("ABC상사"));
    }

    #[test]
    fn test_date_cells_render_as_dates() {
        let date = ExcelDateTime::new(45943.0, ExcelDateTimeType::DateTime, false);
        let datetime = ExcelDateTime::new(45943.5, ExcelDateTimeType::DateTime, false);
        let duration = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);

        assert_eq!(cell_text(&Data::DateTime(date)), "2025-10-13");
        assert_eq!(cell_text(&Data::DateTime(datetime)), "2025-10-13 12:00:00");
        assert_eq!(cell_text(&Data::DateTime(duration)), "36:00:00");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_input(Path::new("companies.txt")).unwrap_err();
        assert!(matches!(err, VerifyError::UnsupportedFormat(_)));
    }
}
