//! テキスト表示（ターミナル用の給与明細カード）

use crate::session::Session;
use payslip_common::{build_card, NormalizedRecord, PayslipCard};

/// カードの内側の幅（文字数）
pub const CARD_INNER_WIDTH: usize = 40;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn truncate(s: &str, width: usize) -> String {
    if char_len(s) <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn centered(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let pad = width - char_len(&text);
    let left = pad / 2;
    format!("|{}{}{}|", " ".repeat(left), text, " ".repeat(pad - left))
}

fn label_value(label: &str, value: &str, width: usize) -> String {
    let inner = width - 2;
    let value = truncate(value, inner.saturating_sub(char_len(label) + 1).max(1));
    let gap = inner.saturating_sub(char_len(label) + char_len(&value)).max(1);
    let line = truncate(&format!("{}{}{}", label, " ".repeat(gap), value), inner);
    let pad = inner - char_len(&line);
    format!("| {}{} |", line, " ".repeat(pad))
}

fn border(ch: char, width: usize) -> String {
    format!("+{}+", ch.to_string().repeat(width))
}

fn separator(width: usize) -> String {
    format!("|{}|", "-".repeat(width))
}

/// カードをテキストに描画
pub fn render_card(card: &PayslipCard) -> String {
    let w = CARD_INNER_WIDTH;
    let mut lines = vec![
        border('-', w),
        centered(&card.company_name.to_uppercase(), w),
        centered(&card.date_heading(), w),
        centered(&format!("[ {} ]", card.month), w),
    ];

    for (i, block) in card.blocks.iter().enumerate() {
        if i > 0 {
            lines.push(separator(w));
        }
        if let Some(title) = block.title {
            lines.push(label_value(title, "", w));
        }
        for line in &block.lines {
            lines.push(label_value(line.label, &line.value, w));
        }
    }

    lines.push(border('=', w));
    lines.push(label_value(card.net.label, &card.net.value, w));
    lines.push(border('-', w));
    lines.join("\n")
}

/// 複数レコードを連続描画
pub fn render_records(records: &[NormalizedRecord], company_name: &str) -> String {
    records
        .iter()
        .map(|r| render_card(&build_card(r, company_name)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// ページ表示（"現在 / 総ページ"）
pub fn page_indicator(session: &Session) -> String {
    format!("{} / {}", session.current_page(), session.page_count())
}

/// 表示中のレコード範囲（"11-20件目 / 全23件"）
pub fn record_range(session: &Session) -> String {
    let first = session.first_index_on_page();
    let last = (first + session.current_records().len()).saturating_sub(1);
    format!("{}-{}件目 / 全{}件", first, last, session.len())
}

/// 現在ページを描画
pub fn render_page(session: &Session, company_name: &str) -> String {
    if session.is_empty() {
        return "(レコードがありません)".to_string();
    }
    format!(
        "{}\n\n{}    {}",
        render_records(session.current_records(), company_name),
        record_range(session),
        page_indicator(session)
    )
}
