//! 給与明細カードのレイアウト定義
//!
//! カードの項目構成（画面・印刷・テキスト共通）と、印刷用のmm基準寸法。

use crate::error::{Error, Result};
use crate::normalizer::columns::*;
use crate::normalizer::{Schema, NET_SALARY_KEY, OT_PAY_KEY, TOTAL_DEDUCTION_KEY, TOTAL_PAY_KEY};

/// 会社名の既定値
pub const DEFAULT_COMPANY_NAME: &str = "ABC Technology Co., Ltd";

// ============================================
// フィールド定義
// ============================================

/// カードに表示する1項目
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub key: &'static str,
    pub label: &'static str,
    /// 控除項目（赤字表示）
    pub negative: bool,
}

const fn field(key: &'static str, label: &'static str) -> FieldDefinition {
    FieldDefinition { key, label, negative: false }
}

const fn deduction(key: &'static str, label: &'static str) -> FieldDefinition {
    FieldDefinition { key, label, negative: true }
}

/// カードの区画（見出し + 項目）
#[derive(Debug, Clone, Copy)]
pub struct CardSection {
    /// 見出し（社員情報欄は見出しなし）
    pub title: Option<&'static str>,
    pub fields: &'static [FieldDefinition],
}

const IDENTITY_FIELDS: &[FieldDefinition] = &[
    field(NAME, "Name"),
    field(EMPLOYEE_ID, "Employee ID"),
    field(DEPARTMENT, "Department"),
    field(POSITION, "Position"),
    field(JOIN_DATE, "Join Date"),
];

/// 明細形式のカード構成
pub const DETAILED_SECTIONS: &[CardSection] = &[
    CardSection { title: None, fields: IDENTITY_FIELDS },
    CardSection {
        title: Some("Attendance"),
        fields: &[
            field(DAYS, "Working Days"),
            field(HALF_SHIFT_DUTY, "Half Shift Duty"),
            field(LEAVE, "Leave"),
            field(UNPAID_LEAVE, "Unpaid Leave"),
        ],
    },
    CardSection {
        title: Some("Earnings"),
        fields: &[
            field(BASIC_SALARY, "Basic Salary"),
            field(OT_PAY_KEY, "OT Pay"),
            field(HALF_SHIFT_RATE, "Half Shift Pay"),
            field(SALARY_ADDITION, "Salary Addition"),
            field(OTHER_ADDITION, "Other Addition"),
            field(ALLOWANCE, "Allowance"),
            field(TOTAL_PAY_KEY, "Total Pay"),
        ],
    },
    CardSection {
        title: Some("Deductions"),
        fields: &[
            deduction(SSB, "SSB"),
            deduction(EPF, "EPF"),
            deduction(UNIFORM, "Uniform"),
            deduction(OTHER_DEDUCTION, "Other Deduction"),
            deduction(TOTAL_DEDUCTION_KEY, "Total Deduction"),
        ],
    },
];

/// 集計形式のカード構成
pub const AGGREGATE_SECTIONS: &[CardSection] = &[
    CardSection { title: None, fields: IDENTITY_FIELDS },
    CardSection {
        title: Some("Earnings"),
        fields: &[
            field(BASIC, "Basic"),
            field(HRA, "HRA"),
            field(ALLOWANCE, "Allowance"),
        ],
    },
    CardSection {
        title: Some("Deductions"),
        fields: &[deduction(DEDUCTIONS, "Deductions")],
    },
];

/// スキーマ別のカード構成
pub fn sections_for(schema: Schema) -> &'static [CardSection] {
    match schema {
        Schema::Detailed => DETAILED_SECTIONS,
        Schema::Aggregate => AGGREGATE_SECTIONS,
    }
}

/// 差引支給額の行（フッター）
pub fn net_field_for(schema: Schema) -> FieldDefinition {
    match schema {
        Schema::Detailed => field(NET_SALARY_KEY, "Net Salary"),
        Schema::Aggregate => field(NET_PAY, "Net Pay"),
    }
}

/// 明細形式の入力フォーマット（ヘッダー行）
pub const REQUIRED_HEADERS_DETAILED: &[&str] = &[
    EMPLOYEE_ID,
    NAME,
    DEPARTMENT,
    POSITION,
    JOIN_DATE,
    DAYS,
    HALF_SHIFT_DUTY,
    LEAVE,
    UNPAID_LEAVE,
    OVERTIME_RATE,
    OVERTIME_HOUR,
    BASIC_SALARY,
    HALF_SHIFT_RATE,
    SALARY_ADDITION,
    OTHER_ADDITION,
    ALLOWANCE,
    SSB,
    EPF,
    UNIFORM,
    OTHER_DEDUCTION,
    PAYSLIP_MONTH,
    PAYSLIP_DATE,
];

/// 集計形式の入力フォーマット（ヘッダー行）
pub const REQUIRED_HEADERS_AGGREGATE: &[&str] = &[
    EMPLOYEE_ID,
    NAME,
    DEPARTMENT,
    POSITION,
    JOIN_DATE,
    BASIC,
    HRA,
    ALLOWANCE,
    DEDUCTIONS,
    NET_PAY,
    PAYSLIP_MONTH,
    PAYSLIP_DATE,
];

pub fn required_headers(schema: Schema) -> &'static [&'static str] {
    match schema {
        Schema::Detailed => REQUIRED_HEADERS_DETAILED,
        Schema::Aggregate => REQUIRED_HEADERS_AGGREGATE,
    }
}

// ============================================
// 印刷レイアウト（mm基準）
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 余白・カード間隔（mm）
pub const MARGIN_MM: f32 = 10.0;
pub const CARD_GAP_MM: f32 = 6.0;

/// タイトル行の高さ（mm）
pub const HEADER_HEIGHT_MM: f32 = 8.0;

/// カード1枚の最小幅・高さ（mm）
pub const MIN_CARD_SIZE_MM: f32 = 30.0;

/// mm → pt変換
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// 印刷レイアウト設定
#[derive(Debug, Clone)]
pub struct PrintLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub gap_mm: f32,
    pub header_height_mm: f32,
    /// 横方向のカード数
    pub columns: u8,
    /// 縦方向のカード数
    pub rows: u8,
}

impl Default for PrintLayout {
    fn default() -> Self {
        Self::grid(2, 2)
    }
}

impl PrintLayout {
    /// A4にcolumns×rowsで配置（0は1に丸める）
    pub fn grid(columns: u8, rows: u8) -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            gap_mm: CARD_GAP_MM,
            header_height_mm: HEADER_HEIGHT_MM,
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    /// グリッドを作り、カードが小さすぎる配置はエラーにする
    pub fn try_grid(columns: u8, rows: u8) -> Result<Self> {
        let layout = Self::grid(columns, rows);
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.card_width_mm(), self.card_height_mm());
        if width < MIN_CARD_SIZE_MM || height < MIN_CARD_SIZE_MM {
            return Err(Error::Config(format!(
                "{}×{} does not fit on the page (card {:.1}×{:.1} mm, minimum {} mm)",
                self.columns, self.rows, width, height, MIN_CARD_SIZE_MM
            )));
        }
        Ok(())
    }

    pub fn cards_per_page(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn usable_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }

    pub fn usable_height_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm * 2.0 - self.header_height_mm
    }

    pub fn card_width_mm(&self) -> f32 {
        let cols = self.columns as f32;
        (self.usable_width_mm() - self.gap_mm * (cols - 1.0)) / cols
    }

    pub fn card_height_mm(&self) -> f32 {
        let rows = self.rows as f32;
        (self.usable_height_mm() - self.gap_mm * (rows - 1.0)) / rows
    }
}

#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_headers_detailed() {
        assert_eq!(REQUIRED_HEADERS_DETAILED.len(), 22);
        assert_eq!(REQUIRED_HEADERS_DETAILED[0], "EmployeeID");
        assert_eq!(REQUIRED_HEADERS_DETAILED[21], "PayslipDate");
    }

    #[test]
    fn test_required_headers_aggregate_has_net_pay() {
        assert!(REQUIRED_HEADERS_AGGREGATE.contains(&"NetPay"));
        assert!(!REQUIRED_HEADERS_DETAILED.contains(&"NetPay"));
    }

    #[test]
    fn test_try_grid_accepts_default_sizes() {
        assert!(PrintLayout::try_grid(2, 2).is_ok());
        assert!(PrintLayout::try_grid(1, 1).is_ok());
        assert!(PrintLayout::try_grid(4, 4).is_ok());
    }

    #[test]
    fn test_try_grid_rejects_oversized_grid() {
        let err = PrintLayout::try_grid(255, 2).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(PrintLayout::try_grid(2, 255).is_err());
        assert!(PrintLayout::grid(255, 1).card_width_mm() < 0.0);
    }

    #[test]
    fn test_templates_detect_their_own_schema() {
        use crate::normalizer::{detect_schema, Schema};
        assert_eq!(detect_schema(REQUIRED_HEADERS_DETAILED.iter().copied()), Schema::Detailed);
        assert_eq!(detect_schema(REQUIRED_HEADERS_AGGREGATE.iter().copied()), Schema::Aggregate);
    }

    #[test]
    fn test_deduction_fields_negative() {
        let deductions = DETAILED_SECTIONS
            .iter()
            .find(|s| s.title == Some("Deductions"))
            .expect("Deductions欄がない");
        assert!(deductions.fields.iter().all(|f| f.negative));
        assert_eq!(deductions.fields.len(), 5);
    }

    #[test]
    fn test_card_dimensions() {
        let layout = PrintLayout::default();
        assert_eq!(layout.cards_per_page(), 4);
        assert!((layout.card_width_mm() - 92.0).abs() < 0.01);
        let total_h = layout.card_height_mm() * 2.0 + layout.gap_mm;
        assert!((total_h - layout.usable_height_mm()).abs() < 0.01);
    }

    #[test]
    fn test_grid_zero_is_clamped() {
        let layout = PrintLayout::grid(0, 0);
        assert_eq!(layout.cards_per_page(), 1);
    }

    #[test]
    fn test_conversion() {
        assert!((MM_TO_PT - 2.835).abs() < 0.01);
        assert!((mm_to_pt(10.0) - 28.35).abs() < 0.1);
    }
}
