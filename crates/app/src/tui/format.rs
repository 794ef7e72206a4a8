use chrono::{DateTime, Datelike, FixedOffset, Timelike};

/// Western Indonesia Time (Asia/Jakarta), UTC+7, no DST
const WIB_OFFSET_SECS: i32 = 7 * 3600;

const MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];

/// Format a Unix timestamp as WIB local time, e.g. `1 Januari 2024 pukul 00.00.00`
pub fn format_wib(unix_secs: i64) -> Option<String> {
    let offset = FixedOffset::east_opt(WIB_OFFSET_SECS)?;
    let local = DateTime::from_timestamp(unix_secs, 0)?.with_timezone(&offset);
    let month = MONTHS.get(local.month0() as usize)?;

    Some(format!(
        "{} {} {} pukul {:02}.{:02}.{:02}",
        local.day(),
        month,
        local.year(),
        local.hour(),
        local.minute(),
        local.second()
    ))
}

/// Status bar line for the last completed check
pub fn last_update_line(last_checked: Option<i64>) -> String {
    match last_checked.and_then(format_wib) {
        Some(when) => format!("Terakhir diperbarui: {} WIB", when),
        None => "Belum diperbarui".to_string(),
    }
}
