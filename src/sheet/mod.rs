pub mod input;
pub mod report;

pub use input::{load_input, InputTable};
pub use report::{check_output_path, report_row, write_report, ReportFormat, REPORT_HEADERS};
