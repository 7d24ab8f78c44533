// Report rendering: the ten-page HTML document and its PDF export.
// HTML rendering is pure; only pdf.rs touches an external process.

pub mod handlers;
pub mod html;
pub mod pdf;
pub mod theme;

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Dates shown on the report and in file names are China Standard Time.
const REPORT_UTC_OFFSET_SECS: i32 = 8 * 3600;

pub fn report_local_time(ts: &DateTime<Utc>) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(REPORT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    ts.with_timezone(&offset)
}
