//! スプレッドシート読み込み
//!
//! 先頭シートのみを対象に、1行目をヘッダーとして各行を RawRow に変換する。

use crate::error::{PayslipError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use payslip_common::date::excel_serial_to_iso;
use payslip_common::{normalize_rows, CellValue, NormalizedRecord, RawRow, SchemaMode};
use std::io::Cursor;
use std::path::Path;

/// 空ヘッダー列の名前
const EMPTY_HEADER: &str = "__EMPTY";

#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// 空セル・列不足の既定値
    pub missing_cell: CellValue,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            missing_cell: CellValue::Number(0.0),
        }
    }
}

/// ファイルを読み込み、正規化済みレコードを返す
///
/// 読み込み（非同期）→ 解析（ブロッキング）→ 正規化 の順に実行する。
pub async fn read_records(
    path: &Path,
    options: ReaderOptions,
    mode: SchemaMode,
) -> Result<Vec<NormalizedRecord>> {
    let rows = read_rows(path, options).await?;
    let records = normalize_rows(&rows, mode);
    tracing::info!(records = records.len(), schema = %mode, "normalized");
    Ok(records)
}

/// ファイルを読み込み、先頭シートの行を返す
pub async fn read_rows(path: &Path, options: ReaderOptions) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(PayslipError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "file read");

    let source = path.display().to_string();
    tokio::task::spawn_blocking(move || parse_workbook(bytes, &options, &source))
        .await
        .map_err(|e| PayslipError::Task(e.to_string()))?
}

/// バイト列から先頭シートの行を取り出す
pub fn parse_workbook(bytes: Vec<u8>, options: &ReaderOptions, source: &str) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
        tracing::warn!(source, error = %e, "unsupported workbook");
        PayslipError::UnsupportedFile(source.to_string())
    })?;

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            tracing::warn!(source, error = %e, "first sheet unreadable");
            return Err(PayslipError::UnsupportedFile(source.to_string()));
        }
        None => return Err(PayslipError::EmptySheet(source.to_string())),
    };

    let rows = rows_from_range(&range, options);
    tracing::debug!(source, rows = rows.len(), "sheet parsed");
    Ok(rows)
}

/// セル範囲 → 行一覧（1行目はヘッダー、空行はスキップ）
pub fn rows_from_range(range: &Range<Data>, options: &ReaderOptions) -> Vec<RawRow> {
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => build_headers(header_row),
        None => return Vec::new(),
    };

    rows.filter(|cells| cells.iter().any(|c| !is_blank(c)))
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(col, header)| {
                    let value = cells.get(col).map(convert_cell).unwrap_or_default();
                    // 空白だけの文字列はそのまま残す
                    let value = if matches!(value, CellValue::Empty) {
                        options.missing_cell.clone()
                    } else {
                        value
                    };
                    (header.clone(), value)
                })
                .collect::<RawRow>()
        })
        .collect()
}

/// ヘッダー名を確定（空は `__EMPTY`、重複は `_1`, `_2` ... を付与）
fn build_headers(cells: &[Data]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(cells.len());
    for cell in cells {
        let base = match convert_cell(cell) {
            CellValue::Empty => EMPTY_HEADER.to_string(),
            value => {
                let text = value.display().trim().to_string();
                if text.is_empty() { EMPTY_HEADER.to_string() } else { text }
            }
        };

        let mut name = base.clone();
        let mut n = 1;
        while headers.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        headers.push(name);
    }
    headers
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// calamineのセル → CellValue
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if dt.is_duration() {
                CellValue::Number(serial)
            } else {
                excel_serial_to_iso(serial)
                    .map(CellValue::Text)
                    .unwrap_or(CellValue::Number(serial))
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}
