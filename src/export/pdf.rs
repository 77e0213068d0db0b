//! 印刷用PDF生成
//!
//! 全レコードをA4にカード形式で配置する。表示セッションの状態は変更しない。
//! フォントファイルを指定すると埋め込んで使い、なければPDF標準のHelveticaで描画する。

use crate::error::{PayslipError, Result};
use payslip_common::export::card_core::{CardLine, PayslipCard};
use payslip_common::export::pdf_core::PrintLayoutCore;
use payslip_common::{build_card, NormalizedRecord, PrintLayout};
use printpdf::{
    BuiltinFont, Color, FontId, Line, LinePoint, Mm, Op, ParsedFont, PdfDocument, PdfPage,
    PdfSaveOptions, Point, Pt, Rgb, TextItem,
};
use std::path::Path;

/// 平均文字幅（フォントサイズ比）
const AVG_CHAR_WIDTH: f32 = 0.5;

/// Helveticaで描けない文字の置き換え
const REPLACEMENT_CHAR: char = '?';

/// 描画に使うフォント
#[derive(Debug, Clone)]
pub enum PrintFont {
    /// PDF標準フォント（WinAnsi範囲の文字のみ）
    Builtin,
    /// 文書に埋め込んだフォント
    Embedded(FontId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextStyle {
    Regular,
    Bold,
}

impl TextStyle {
    fn builtin(self) -> BuiltinFont {
        match self {
            TextStyle::Regular => BuiltinFont::Helvetica,
            TextStyle::Bold => BuiltinFont::HelveticaBold,
        }
    }
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn black() -> Color {
    rgb(0.0, 0.0, 0.0)
}

fn gray() -> Color {
    rgb(0.42, 0.45, 0.5)
}

fn red() -> Color {
    rgb(0.86, 0.15, 0.15)
}

fn green() -> Color {
    rgb(0.02, 0.59, 0.41)
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_CHAR_WIDTH
}

/// Helveticaで描ける文字か（Latin-1の印字可能文字）
fn is_builtin_char(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF)
}

/// 標準フォント用に描けない文字を置き換える
fn builtin_safe_text(text: &str) -> String {
    text.chars()
        .map(|c| if is_builtin_char(c) { c } else { REPLACEMENT_CHAR })
        .collect()
}

/// フォントファイルを読み込む
pub fn load_font(path: &Path) -> Result<ParsedFont> {
    let bytes = std::fs::read(path).map_err(|e| {
        PayslipError::PdfGeneration(format!("フォント読み込みエラー: {}: {}", path.display(), e))
    })?;
    parse_font(&bytes, &path.display().to_string())
}

/// フォントのバイト列を解析
pub fn parse_font(bytes: &[u8], source: &str) -> Result<ParsedFont> {
    let mut warnings = Vec::new();
    let font = ParsedFont::from_bytes(bytes, 0, &mut warnings)
        .ok_or_else(|| PayslipError::PdfGeneration(format!("フォントを解析できません: {}", source)))?;
    tracing::debug!(source, warnings = warnings.len(), "font parsed");
    Ok(font)
}

/// 標準フォントでは描けない文字がカードに含まれるか
pub fn needs_unicode_font(records: &[NormalizedRecord], company_name: &str) -> bool {
    records.iter().any(|record| {
        let card = build_card(record, company_name);
        let needs = card_texts(&card).any(|text| !text.chars().all(is_builtin_char));
        needs
    })
}

fn card_texts(card: &PayslipCard) -> impl Iterator<Item = &str> {
    let lines = card
        .blocks
        .iter()
        .flat_map(|b| b.lines.iter())
        .chain(std::iter::once(&card.net))
        .flat_map(|l| [l.label, l.value.as_str()]);
    [card.company_name.as_str(), card.month.as_str(), card.date_label.as_str()]
        .into_iter()
        .chain(lines)
}

#[allow(clippy::too_many_arguments)]
fn push_text(
    ops: &mut Vec<Op>,
    font: &PrintFont,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    style: TextStyle,
    color: Color,
) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetFillColor { col: color });
    ops.push(Op::SetTextCursor { pos: Point { x: Pt(x), y: Pt(y) } });
    match font {
        PrintFont::Builtin => {
            let builtin = style.builtin();
            ops.push(Op::SetFontSizeBuiltinFont { size: Pt(size), font: builtin });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(builtin_safe_text(text))],
                font: builtin,
            });
        }
        // 埋め込みフォントは1書体のみ（太字指定は無視）
        PrintFont::Embedded(id) => {
            ops.push(Op::SetFontSize { size: Pt(size), font: id.clone() });
            ops.push(Op::WriteText {
                items: vec![TextItem::Text(text.to_string())],
                font: id.clone(),
            });
        }
    }
    ops.push(Op::EndTextSection);
}

fn push_line(ops: &mut Vec<Op>, points: &[(f32, f32)], closed: bool, color: Color, thickness: f32) {
    ops.push(Op::SetOutlineColor { col: color });
    ops.push(Op::SetOutlineThickness { pt: Pt(thickness) });
    ops.push(Op::DrawLine {
        line: Line {
            points: points
                .iter()
                .map(|&(x, y)| LinePoint { p: Point { x: Pt(x), y: Pt(y) }, bezier: false })
                .collect(),
            is_closed: closed,
        },
    });
}

/// 1枚のカードを描画
fn push_card(
    ops: &mut Vec<Op>,
    font: &PrintFont,
    core: &PrintLayoutCore,
    card: &PayslipCard,
    left: f32,
    top: f32,
) {
    let size = core.font_size_pt;
    let right = left + core.card_width_pt;
    let inner_left = left + core.card_padding_pt;
    let inner_right = right - core.card_padding_pt;
    let center = left + core.card_width_pt / 2.0;

    // 枠線
    let bottom = top - core.card_height_pt;
    push_line(ops, &[(left, top), (right, top), (right, bottom), (left, bottom)], true, black(), 0.8);

    let mut line = 0;
    let centered = |ops: &mut Vec<Op>, line: usize, text: &str, style: TextStyle, color: Color| {
        let x = center - text_width(text, size) / 2.0;
        push_text(ops, font, text, x, core.line_y_pt(top, line), size, style, color);
    };

    centered(ops, line, &card.company_name.to_uppercase(), TextStyle::Bold, black());
    line += 1;
    centered(ops, line, &card.date_heading(), TextStyle::Regular, gray());
    line += 1;
    centered(ops, line, &card.month, TextStyle::Bold, rgb(0.15, 0.39, 0.92));
    line += 1;

    let row = |ops: &mut Vec<Op>, line: usize, item: &CardLine| {
        let y = core.line_y_pt(top, line);
        let color = if item.negative { red() } else { black() };
        push_text(ops, font, item.label, inner_left, y, size, TextStyle::Regular, color.clone());
        let x = inner_right - text_width(&item.value, size);
        push_text(ops, font, &item.value, x, y, size, TextStyle::Bold, color);
    };

    for block in &card.blocks {
        let y = core.line_y_pt(top, line) + core.line_height_pt * 0.4;
        push_line(ops, &[(inner_left, y), (inner_right, y)], false, gray(), 0.3);
        line += 1;

        if let Some(title) = block.title {
            push_text(ops, font, title, inner_left, core.line_y_pt(top, line), size, TextStyle::Bold, gray());
            line += 1;
        }
        for item in &block.lines {
            row(ops, line, item);
            line += 1;
        }
    }

    let y = core.line_y_pt(top, line) + core.line_height_pt * 0.4;
    push_line(ops, &[(inner_left, y), (inner_right, y)], false, green(), 1.2);
    line += 1;
    let net_y = core.line_y_pt(top, line);
    push_text(ops, font, card.net.label, inner_left, net_y, size, TextStyle::Bold, green());
    let x = inner_right - text_width(&card.net.value, size);
    push_text(ops, font, &card.net.value, x, net_y, size, TextStyle::Bold, green());
}

/// 全レコードのページを構築
pub fn build_print_pages(
    records: &[NormalizedRecord],
    company_name: &str,
    title: &str,
    layout: &PrintLayout,
    font: &PrintFont,
) -> Vec<PdfPage> {
    let cards: Vec<PayslipCard> = records.iter().map(|r| build_card(r, company_name)).collect();
    let card_lines = cards.iter().map(PayslipCard::line_count).max().unwrap_or(0);
    let core = PrintLayoutCore::from_layout(layout, card_lines);
    let total_pages = core.page_count(cards.len());

    (0..total_pages)
        .map(|page_num| {
            let start = page_num * core.cards_per_page;
            let end = (start + core.cards_per_page).min(cards.len());
            let mut ops = Vec::new();

            let heading = format!("{}  ({}/{})", title, page_num + 1, total_pages);
            push_text(&mut ops, font, &heading, core.margin_pt, core.title_y_pt(), 11.0, TextStyle::Bold, black());

            for (slot, card) in cards[start..end].iter().enumerate() {
                let (left, top) = core.slot_origin_pt(slot);
                push_card(&mut ops, font, &core, card, left, top);
            }

            PdfPage::new(Mm(layout.page_width_mm), Mm(layout.page_height_mm), ops)
        })
        .collect()
}

/// 印刷用PDFをバイト列で生成（フォント未指定ならHelvetica）
pub fn render_print_pdf(
    records: &[NormalizedRecord],
    company_name: &str,
    title: &str,
    layout: &PrintLayout,
    font: Option<&ParsedFont>,
) -> Vec<u8> {
    let mut doc = PdfDocument::new(title);
    let print_font = match font {
        Some(parsed) => PrintFont::Embedded(doc.add_font(parsed)),
        None => {
            if needs_unicode_font(records, company_name) {
                tracing::warn!("non-Latin text replaced; pass a font file to keep it");
            }
            PrintFont::Builtin
        }
    };

    let pages = build_print_pages(records, company_name, title, layout, &print_font);
    let mut warnings = Vec::new();
    let bytes = doc
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "pdf warnings");
    }
    bytes
}

/// 印刷用PDFをファイルに出力
pub fn generate_pdf(
    records: &[NormalizedRecord],
    output_path: &Path,
    company_name: &str,
    title: &str,
    layout: &PrintLayout,
    font_path: Option<&Path>,
) -> Result<()> {
    let font = font_path.map(load_font).transpose()?;
    let bytes = render_print_pdf(records, company_name, title, layout, font.as_ref());
    std::fs::write(output_path, bytes)
        .map_err(|e| PayslipError::PdfGeneration(format!("PDF保存エラー: {}", e)))?;
    Ok(())
}
