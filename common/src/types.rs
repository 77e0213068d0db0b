//! 給与データの型定義
//!
//! - CellValue: スプレッドシートの1セル
//! - RawRow: 1行分（ヘッダー名 → セル値、シートの列順を保持）

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// セル値（文字列・数値・空）
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// 表示用文字列
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// 数値の表示（通貨・ロケール書式なし、最短表現）
///
/// 整数値は小数点なし: 274400.0 → "274400"
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// スプレッドシートの1行
///
/// 列順はシートのヘッダー順。同名ヘッダーは後勝ち。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// セルを追加（既存の列は置き換え）
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<CellValue>) {
        let header = header.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(h, _)| *h == header) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((header, value)),
        }
    }

    /// ビルダー形式の追加（テスト・サンプル生成用）
    pub fn with(mut self, header: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(header, value);
        self
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    pub fn contains(&self, header: &str) -> bool {
        self.get(header).is_some()
    }

    /// 表示用文字列（列がなければ空文字）
    pub fn display(&self, header: &str) -> String {
        self.get(header).map(CellValue::display).unwrap_or_default()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for RawRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_integer() {
        assert_eq!(format_number(274400.0), "274400");
        assert_eq!(format_number(-5600.0), "-5600");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_format_number_fraction() {
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::text("Sales").display(), "Sales");
        assert_eq!(CellValue::Number(12.0).display(), "12");
        assert_eq!(CellValue::Empty.display(), "");
    }

    #[test]
    fn test_row_preserves_header_order() {
        let row = RawRow::new()
            .with("Name", "Aung")
            .with("EmployeeID", "E001")
            .with("BasicSalary", 280000.0);
        let headers: Vec<&str> = row.headers().collect();
        assert_eq!(headers, vec!["Name", "EmployeeID", "BasicSalary"]);
    }

    #[test]
    fn test_row_insert_replaces_existing() {
        let mut row = RawRow::new().with("SSB", 100.0);
        row.insert("SSB", 5600.0);
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("SSB"), Some(&CellValue::Number(5600.0)));
    }

    #[test]
    fn test_row_display_missing_column() {
        let row = RawRow::new();
        assert_eq!(row.display("Department"), "");
        assert!(!row.contains("Department"));
    }

    #[test]
    fn test_row_serialize_as_ordered_map() {
        let row = RawRow::new().with("Name", "Aung").with("Days", 26.0);
        let json = serde_json::to_string(&row).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"Name":"Aung","Days":26.0}"#);
    }

    #[test]
    fn test_cell_deserialize_untagged() {
        let values: Vec<CellValue> = serde_json::from_str(r#"[1.5, "x", null]"#).expect("デシリアライズ失敗");
        assert_eq!(values, vec![CellValue::Number(1.5), CellValue::text("x"), CellValue::Empty]);
    }
}
