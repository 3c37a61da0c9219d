use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use tracing::info;

use crate::{
    error::{Result, VerifyError},
    geocode::LookupResult,
    utils,
    verify::{BatchReport, ValidationOutcome},
};

pub const REPORT_HEADERS: [&str; 8] = [
    "기업명",
    "분지점",
    "장부주소",
    "전자조회",
    "표준주소",
    "검증주소",
    "유사도",
    "판정",
];

pub const UNRESOLVED_LABEL: &str = "❌ 검색불가";
pub const RESULT_SHEET: &str = "검증결과";
pub const SUMMARY_SHEET: &str = "요약";

const COLUMN_WIDTHS: [f64; 8] = [24.0, 14.0, 42.0, 10.0, 42.0, 42.0, 8.0, 10.0];

pub fn electronic_label(eligible: bool) -> &'static str {
    if eligible {
        "🔵 가능"
    } else {
        "⚪ 서면"
    }
}

pub fn lookup_label(result: &LookupResult) -> &str {
    result.address().unwrap_or(UNRESOLVED_LABEL)
}

/// Display values for one outcome, in `REPORT_HEADERS` order.
pub fn report_row(outcome: &ValidationOutcome) -> [String; 8] {
    [
        outcome.company_name.clone(),
        outcome.branch_name.clone(),
        outcome.ledger_address.clone(),
        electronic_label(outcome.electronic_eligible).to_string(),
        lookup_label(&outcome.standardized_address).to_string(),
        lookup_label(&outcome.verified_address).to_string(),
        format!("{}%", outcome.similarity_score),
        outcome.verdict.label().to_string(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
}

/// Pick the report format from the output file extension.
pub fn check_output_path(path: &Path) -> Result<ReportFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" => Ok(ReportFormat::Xlsx),
        "csv" => Ok(ReportFormat::Csv),
        other => Err(VerifyError::UnsupportedFormat(format!(
            "cannot write '{}' reports (expected xlsx or csv)",
            other
        ))),
    }
}

/// Write the report as xlsx or csv, chosen by the file extension.
pub fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    match check_output_path(path)? {
        ReportFormat::Xlsx => write_xlsx(report, path)?,
        ReportFormat::Csv => write_csv(report, path)?,
    }

    info!("Report with {} rows written to {}", report.outcomes.len(), path.display());
    Ok(())
}

fn write_xlsx(report: &BatchReport, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9E1F2))
        .set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(RESULT_SHEET)?;

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (idx, outcome) in report.outcomes.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, value) in report_row(outcome).iter().enumerate() {
            worksheet.write_string(row, col as u16, value)?;
        }
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let summary = &report.summary;
    let counts: [(&str, usize); 5] = [
        ("전체", summary.total),
        ("일치", summary.matched),
        ("확인 필요", summary.needs_review),
        ("주소 검색불가", summary.unresolved),
        ("전자조회 가능", summary.electronic_eligible),
    ];

    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;
    sheet.write_string_with_format(0, 0, "항목", &header_format)?;
    sheet.write_string_with_format(0, 1, "값", &header_format)?;
    sheet.write_string(1, 0, "생성시각")?;
    sheet.write_string(1, 1, utils::format_timestamp(&report.generated_at))?;
    sheet.write_string(2, 0, "판정 기준")?;
    sheet.write_string(2, 1, format!("{}%", report.threshold))?;
    for (idx, (label, count)) in counts.iter().enumerate() {
        let row = (idx + 3) as u32;
        sheet.write_string(row, 0, *label)?;
        sheet.write_number(row, 1, *count as f64)?;
    }
    let rate_row = (counts.len() + 3) as u32;
    sheet.write_string(rate_row, 0, "일치율")?;
    sheet.write_string(rate_row, 1, format!("{:.1}%", summary.match_rate()))?;
    sheet.set_column_width(0, 16)?;
    sheet.set_column_width(1, 24)?;

    workbook.save(path)?;
    Ok(())
}

fn write_csv(report: &BatchReport, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    // BOM so Excel opens the Korean text as UTF-8
    file.write_all("\u{feff}".as_bytes())?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(REPORT_HEADERS)?;
    for outcome in &report.outcomes {
        writer.write_record(report_row(outcome))?;
    }
    writer.flush()?;
    Ok(())
}
