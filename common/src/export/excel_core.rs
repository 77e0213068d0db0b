//! Excel生成（共通ライブラリ）
//!
//! 正規化済みレコードの一覧と、入力フォーマットのテンプレートを生成

use crate::error::Result;
use crate::layout::required_headers;
use crate::normalizer::{NormalizedRecord, Schema};
use crate::types::CellValue;
use rust_xlsxwriter::*;

/// 出力シート名
pub const RECORDS_SHEET_NAME: &str = "Payslips";
pub const TEMPLATE_SHEET_NAME: &str = "Payroll";

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_background_color(Color::RGB(0xF3F4F6))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA))
}

/// 全レコードの出力列（初出順、重複なし）
pub fn collect_headers(records: &[NormalizedRecord]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for header in record.output_headers() {
            if !headers.iter().any(|h| h == header) {
                headers.push(header.to_string());
            }
        }
    }
    headers
}

/// 正規化済みレコードをExcelバッファに出力
///
/// 1行目がヘッダー、以降は入力順に1レコード1行。
pub fn generate_records_buffer(records: &[NormalizedRecord]) -> Result<Vec<u8>> {
    let headers = collect_headers(records);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(RECORDS_SHEET_NAME)?;

    let header_format = header_format();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        worksheet.set_column_width(col as u16, (header.len() as f64 + 4.0).max(12.0))?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            match record.field_value(header) {
                CellValue::Number(n) => {
                    worksheet.write_number(row, col, n)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row, col, &s)?;
                }
                CellValue::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// 入力フォーマットのテンプレート（ヘッダー行のみ）を生成
pub fn generate_template_buffer(schema: Schema) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TEMPLATE_SHEET_NAME)?;

    let header_format = header_format();
    for (col, header) in required_headers(schema).iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        worksheet.set_column_width(col as u16, (header.len() as f64 + 4.0).max(12.0))?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_row;
    use crate::types::RawRow;

    #[test]
    fn test_collect_headers_includes_derived() {
        let row = RawRow::new().with("Name", "A").with("BasicSalary", 100.0);
        let records = vec![normalize_row(&row, Schema::Detailed, 0)];
        let headers = collect_headers(&records);
        assert_eq!(
            headers,
            vec!["Name", "BasicSalary", "otPay", "totalPay", "totalDeduction", "netSalary"]
        );
    }

    #[test]
    fn test_collect_headers_aggregate_has_no_derived() {
        let row = RawRow::new().with("Name", "A").with("NetPay", 100.0);
        let records = vec![normalize_row(&row, Schema::Aggregate, 0)];
        assert_eq!(collect_headers(&records), vec!["Name", "NetPay"]);
    }

    #[test]
    fn test_generate_records_buffer() {
        let row = RawRow::new().with("Name", "A").with("BasicSalary", 100.0);
        let records = vec![normalize_row(&row, Schema::Detailed, 0)];
        let buffer = generate_records_buffer(&records).expect("Excel生成失敗");
        // xlsx は ZIP（PK ヘッダー）
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_generate_template_buffer() {
        let buffer = generate_template_buffer(Schema::Detailed).expect("テンプレート生成失敗");
        assert_eq!(&buffer[..2], b"PK");
    }
}
