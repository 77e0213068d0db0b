//! 給与レコード正規化モジュール
//!
//! スプレッドシートの行（RawRow）から支給額・控除額・差引支給額を導出する。
//! I/Oなし・副作用なしの純粋関数のみ。
//!
//! ## スキーマ
//! - 明細形式（Detailed）: 支給・控除の内訳列から合計を計算
//! - 集計形式（Aggregate）: `NetPay` / `Deductions` をそのまま使う

use crate::types::{CellValue, RawRow};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// 列名定義
pub mod columns {
    pub const EMPLOYEE_ID: &str = "EmployeeID";
    pub const NAME: &str = "Name";
    pub const DEPARTMENT: &str = "Department";
    pub const POSITION: &str = "Position";
    pub const JOIN_DATE: &str = "JoinDate";

    pub const DAYS: &str = "Days";
    pub const HALF_SHIFT_DUTY: &str = "HalfShiftDuty";
    pub const LEAVE: &str = "Leave";
    pub const UNPAID_LEAVE: &str = "UnpaidLeave";

    pub const BASIC_SALARY: &str = "BasicSalary";
    pub const BASIC: &str = "Basic";
    pub const OVERTIME_RATE: &str = "OvertimeRate";
    pub const OVERTIME_HOUR: &str = "OvertimeHour";
    pub const HALF_SHIFT_RATE: &str = "HalfShiftRate";
    pub const SALARY_ADDITION: &str = "SalaryAddition";
    pub const OTHER_ADDITION: &str = "OtherAddition";
    pub const ALLOWANCE: &str = "Allowance";
    pub const HRA: &str = "HRA";

    pub const SSB: &str = "SSB";
    pub const EPF: &str = "EPF";
    pub const UNIFORM: &str = "Uniform";
    pub const OTHER_DEDUCTION: &str = "OtherDeduction";
    pub const DEDUCTIONS: &str = "Deductions";

    pub const PAYSLIP_MONTH: &str = "PayslipMonth";
    pub const PAYSLIP_DATE: &str = "PayslipDate";

    pub const NET_PAY: &str = "NetPay";
}

use columns::*;

/// 導出フィールド名（出力時のキー）
pub const OT_PAY_KEY: &str = "otPay";
pub const TOTAL_PAY_KEY: &str = "totalPay";
pub const TOTAL_DEDUCTION_KEY: &str = "totalDeduction";
pub const NET_SALARY_KEY: &str = "netSalary";

/// スキーマ選択（設定・CLI用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// ヘッダーに `NetPay` か `Deductions` があれば集計形式、なければ明細形式
    #[default]
    Auto,
    Detailed,
    Aggregate,
}

impl SchemaMode {
    /// ヘッダー一覧からスキーマを確定
    pub fn resolve<'a>(&self, headers: impl IntoIterator<Item = &'a str>) -> Schema {
        match self {
            SchemaMode::Detailed => Schema::Detailed,
            SchemaMode::Aggregate => Schema::Aggregate,
            SchemaMode::Auto => detect_schema(headers),
        }
    }
}

impl std::str::FromStr for SchemaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SchemaMode::Auto),
            "detailed" | "detail" => Ok(SchemaMode::Detailed),
            "aggregate" | "agg" => Ok(SchemaMode::Aggregate),
            _ => Err(format!("Unknown schema: {}. Use auto, detailed, or aggregate", s)),
        }
    }
}

impl std::fmt::Display for SchemaMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaMode::Auto => write!(f, "auto"),
            SchemaMode::Detailed => write!(f, "detailed"),
            SchemaMode::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// 確定済みスキーマ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Detailed,
    Aggregate,
}

/// ヘッダーからスキーマを判定
///
/// 集計値の列（`NetPay` / `Deductions`）が1つでもあれば集計形式。
pub fn detect_schema<'a>(headers: impl IntoIterator<Item = &'a str>) -> Schema {
    if headers.into_iter().any(|h| h == NET_PAY || h == DEDUCTIONS) {
        Schema::Aggregate
    } else {
        Schema::Detailed
    }
}

/// セル値を数値に変換
///
/// 列なし・空セル・数値として解釈できない文字列はすべて 0。
pub fn to_number(value: Option<&CellValue>) -> f64 {
    match value {
        Some(CellValue::Number(n)) if n.is_finite() => *n,
        Some(CellValue::Text(s)) => parse_number_text(s),
        _ => 0.0,
    }
}

fn parse_number_text(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return i64::from_str_radix(&trimmed[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(0.0);
    }

    // "inf" / "NaN" もパース自体は成功するので有限値のみ採用
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// 明細形式で導出される合計
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollTotals {
    pub ot_pay: f64,
    pub total_pay: f64,
    pub total_deduction: f64,
    pub net_salary: f64,
}

impl PayrollTotals {
    /// 行から合計を計算
    pub fn compute(row: &RawRow) -> Self {
        let n = |key: &str| to_number(row.get(key));

        let ot_pay = n(OVERTIME_RATE) * n(OVERTIME_HOUR);

        let total_pay = basic_salary(row)
            + ot_pay
            + n(HALF_SHIFT_RATE)
            + n(SALARY_ADDITION)
            + n(OTHER_ADDITION)
            + n(ALLOWANCE);

        let total_deduction = n(SSB) + n(EPF) + n(UNIFORM) + n(OTHER_DEDUCTION);

        Self {
            ot_pay,
            total_pay,
            total_deduction,
            net_salary: total_pay - total_deduction,
        }
    }
}

/// 基本給（`BasicSalary` 列がなければ `Basic` 列）
fn basic_salary(row: &RawRow) -> f64 {
    match row.get(BASIC_SALARY) {
        Some(v) => to_number(Some(v)),
        None => to_number(row.get(BASIC)),
    }
}

/// レコードの合計欄
#[derive(Debug, Clone, PartialEq)]
pub enum RecordTotals {
    /// 明細形式: 導出値
    Derived(PayrollTotals),
    /// 集計形式: 行の値をそのまま保持
    Supplied {
        net_pay: CellValue,
        deductions: CellValue,
    },
}

/// 正規化済みレコード
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// 元シートでの行番号（0始まり、ヘッダー行を除く）
    pub index: usize,
    pub row: RawRow,
    pub totals: RecordTotals,
}

impl NormalizedRecord {
    pub fn schema(&self) -> Schema {
        match self.totals {
            RecordTotals::Derived(_) => Schema::Detailed,
            RecordTotals::Supplied { .. } => Schema::Aggregate,
        }
    }

    /// 明細形式の導出値
    pub fn derived(&self) -> Option<&PayrollTotals> {
        match &self.totals {
            RecordTotals::Derived(t) => Some(t),
            RecordTotals::Supplied { .. } => None,
        }
    }

    /// 差引支給額のセル値（導出値または入力値）
    pub fn net_pay(&self) -> CellValue {
        match &self.totals {
            RecordTotals::Derived(t) => CellValue::Number(t.net_salary),
            RecordTotals::Supplied { net_pay, .. } => net_pay.clone(),
        }
    }

    /// 控除合計のセル値
    pub fn total_deduction(&self) -> CellValue {
        match &self.totals {
            RecordTotals::Derived(t) => CellValue::Number(t.total_deduction),
            RecordTotals::Supplied { deductions, .. } => deductions.clone(),
        }
    }

    /// 導出フィールドの値（明細形式のみ）
    pub fn derived_value(&self, key: &str) -> Option<f64> {
        let t = self.derived()?;
        match key {
            OT_PAY_KEY => Some(t.ot_pay),
            TOTAL_PAY_KEY => Some(t.total_pay),
            TOTAL_DEDUCTION_KEY => Some(t.total_deduction),
            NET_SALARY_KEY => Some(t.net_salary),
            _ => None,
        }
    }

    /// 出力用セル値（導出フィールド名も受け付ける）
    pub fn field_value(&self, key: &str) -> CellValue {
        match self.derived_value(key) {
            Some(n) => CellValue::Number(n),
            None => self.row.get(key).cloned().unwrap_or_default(),
        }
    }

    /// 表示用フィールド値
    pub fn field_display(&self, key: &str) -> String {
        self.field_value(key).display()
    }

    /// 出力列一覧（元の列 + 導出列）
    pub fn output_headers(&self) -> Vec<&str> {
        let mut headers: Vec<&str> = self.row.headers().collect();
        if self.derived().is_some() {
            headers.extend([OT_PAY_KEY, TOTAL_PAY_KEY, TOTAL_DEDUCTION_KEY, NET_SALARY_KEY]);
        }
        headers
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (header, value) in self.row.iter() {
            map.serialize_entry(header, value)?;
        }
        if let RecordTotals::Derived(t) = &self.totals {
            map.serialize_entry(OT_PAY_KEY, &t.ot_pay)?;
            map.serialize_entry(TOTAL_PAY_KEY, &t.total_pay)?;
            map.serialize_entry(TOTAL_DEDUCTION_KEY, &t.total_deduction)?;
            map.serialize_entry(NET_SALARY_KEY, &t.net_salary)?;
        }
        map.end()
    }
}

/// 1行を正規化
pub fn normalize_row(row: &RawRow, schema: Schema, index: usize) -> NormalizedRecord {
    let totals = match schema {
        Schema::Detailed => RecordTotals::Derived(PayrollTotals::compute(row)),
        Schema::Aggregate => RecordTotals::Supplied {
            net_pay: row.get(NET_PAY).cloned().unwrap_or_default(),
            deductions: row.get(DEDUCTIONS).cloned().unwrap_or_default(),
        },
    };

    NormalizedRecord {
        index,
        row: row.clone(),
        totals,
    }
}

/// シート全体を正規化
///
/// スキーマはシート単位で1回だけ判定する。出力順は入力順と同じ。
pub fn normalize_rows(rows: &[RawRow], mode: SchemaMode) -> Vec<NormalizedRecord> {
    let schema = mode.resolve(rows.iter().flat_map(|r| r.headers()));
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_row(row, schema, i))
        .collect()
}
