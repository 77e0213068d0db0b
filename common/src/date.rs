//! 日付ラベル
//!
//! 明細日（PayslipDate）を `dd/mm/yyyy` で表示する。解釈できない値は空文字。

use crate::types::CellValue;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// 表示フォーマット（en-GB）
pub const LABEL_FORMAT: &str = "%d/%m/%Y";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Excelシリアル値の有効範囲（1900/01/01 〜 9999/12/31）
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// セル値を日付ラベルに変換
pub fn format_date_label(value: &CellValue) -> String {
    let date = match value {
        CellValue::Text(s) => parse_date_text(s),
        CellValue::Number(n) => excel_serial_to_datetime(*n).map(|dt| dt.date()),
        CellValue::Empty => None,
    };
    date.map(|d| d.format(LABEL_FORMAT).to_string())
        .unwrap_or_default()
}

/// 文字列を日付として解釈
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
    {
        return Some(d);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Excelシリアル値 → 日時
///
/// 1900年うるう年バグを含む起点（1899/12/30）で計算する。
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 || serial >= MAX_EXCEL_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

/// Excelシリアル値 → ISO文字列（時刻部分がなければ日付のみ）
pub fn excel_serial_to_iso(serial: f64) -> Option<String> {
    let dt = excel_serial_to_datetime(serial)?;
    if serial.fract() == 0.0 {
        Some(dt.format("%Y-%m-%d").to_string())
    } else {
        Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_label() {
        assert_eq!(format_date_label(&CellValue::text("2025-01-31")), "31/01/2025");
    }

    #[test]
    fn test_us_style_date_label() {
        assert_eq!(format_date_label(&CellValue::text("01/31/2025")), "31/01/2025");
    }

    #[test]
    fn test_long_month_label() {
        assert_eq!(format_date_label(&CellValue::text("31 January 2025")), "31/01/2025");
        assert_eq!(format_date_label(&CellValue::text("Jan 31, 2025")), "31/01/2025");
    }

    #[test]
    fn test_datetime_label() {
        assert_eq!(format_date_label(&CellValue::text("2025-01-31 09:30:00")), "31/01/2025");
        assert_eq!(format_date_label(&CellValue::text("2025-01-31T09:30:00+06:30")), "31/01/2025");
    }

    #[test]
    fn test_unparsable_date_is_empty() {
        assert_eq!(format_date_label(&CellValue::text("end of month")), "");
        assert_eq!(format_date_label(&CellValue::text("")), "");
        assert_eq!(format_date_label(&CellValue::Empty), "");
        assert_eq!(format_date_label(&CellValue::Number(0.0)), "");
    }

    #[test]
    fn test_excel_serial_label() {
        // 45688 = 2025/01/31
        assert_eq!(format_date_label(&CellValue::Number(45688.0)), "31/01/2025");
    }

    #[test]
    fn test_excel_serial_to_iso() {
        assert_eq!(excel_serial_to_iso(45688.0).as_deref(), Some("2025-01-31"));
        assert_eq!(excel_serial_to_iso(45688.5).as_deref(), Some("2025-01-31 12:00:00"));
        assert_eq!(excel_serial_to_iso(-1.0), None);
    }
}
