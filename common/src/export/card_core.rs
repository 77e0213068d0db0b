//! 給与明細カードの構築（テキスト・PDF共通）

use crate::date::format_date_label;
use crate::layout::{net_field_for, sections_for};
use crate::normalizer::columns::{PAYSLIP_DATE, PAYSLIP_MONTH};
use crate::normalizer::NormalizedRecord;
use crate::types::CellValue;

/// カードの1行
#[derive(Debug, Clone, PartialEq)]
pub struct CardLine {
    pub label: &'static str,
    pub value: String,
    pub negative: bool,
}

/// カードの区画
#[derive(Debug, Clone, PartialEq)]
pub struct CardBlock {
    pub title: Option<&'static str>,
    pub lines: Vec<CardLine>,
}

/// 描画前の給与明細カード
#[derive(Debug, Clone, PartialEq)]
pub struct PayslipCard {
    pub company_name: String,
    /// `dd/mm/yyyy`（解釈不能なら空）
    pub date_label: String,
    pub month: String,
    pub blocks: Vec<CardBlock>,
    pub net: CardLine,
}

impl PayslipCard {
    pub fn date_heading(&self) -> String {
        format!("Payslip Date: {}", self.date_label)
    }

    /// 描画行数（ヘッダー3行 + 区画見出し + 項目 + 区切り + フッター）
    pub fn line_count(&self) -> usize {
        let body: usize = self
            .blocks
            .iter()
            .map(|b| b.lines.len() + usize::from(b.title.is_some()) + 1)
            .sum();
        3 + body + 1
    }
}

/// レコードからカードを構築
pub fn build_card(record: &NormalizedRecord, company_name: &str) -> PayslipCard {
    let schema = record.schema();

    let blocks = sections_for(schema)
        .iter()
        .map(|section| CardBlock {
            title: section.title,
            lines: section
                .fields
                .iter()
                .map(|f| CardLine {
                    label: f.label,
                    value: record.field_display(f.key),
                    negative: f.negative,
                })
                .collect(),
        })
        .collect();

    let net_field = net_field_for(schema);
    let net = CardLine {
        label: net_field.label,
        value: record.net_pay().display(),
        negative: false,
    };

    let date = record.row.get(PAYSLIP_DATE).cloned().unwrap_or(CellValue::Empty);

    PayslipCard {
        company_name: company_name.to_string(),
        date_label: format_date_label(&date),
        month: record.row.display(PAYSLIP_MONTH),
        blocks,
        net,
    }
}
