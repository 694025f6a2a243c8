pub mod csv;
pub mod format;

pub use self::csv::{read_rows, write_report, ExportedRow};
pub use format::{format_date, format_money, format_rate, format_summary, period_label};
