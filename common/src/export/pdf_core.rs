//! 印刷PDFのレイアウト計算（pt単位）

use crate::layout::{mm_to_pt, PrintLayout};

/// 本文フォントサイズの上限（pt）
const MAX_FONT_SIZE_PT: f32 = 9.0;

/// PDF描画で使用するレイアウト計算結果（pt単位、原点は左下）
#[derive(Debug, Clone)]
pub struct PrintLayoutCore {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_pt: f32,
    pub gap_pt: f32,
    pub header_height_pt: f32,
    pub card_width_pt: f32,
    pub card_height_pt: f32,
    pub card_padding_pt: f32,
    pub line_height_pt: f32,
    pub font_size_pt: f32,
    pub columns: usize,
    pub cards_per_page: usize,
}

impl PrintLayoutCore {
    /// `card_lines` はページ内で最も行数の多いカードの行数（`PayslipCard::line_count`）
    pub fn from_layout(layout: &PrintLayout, card_lines: usize) -> Self {
        let card_height_pt = mm_to_pt(layout.card_height_mm());
        let card_padding_pt = 8.0;
        let line_height_pt = (card_height_pt - card_padding_pt * 2.0) / card_lines.max(1) as f32;
        let font_size_pt = (line_height_pt * 0.75).min(MAX_FONT_SIZE_PT);

        Self {
            page_width_pt: mm_to_pt(layout.page_width_mm),
            page_height_pt: mm_to_pt(layout.page_height_mm),
            margin_pt: mm_to_pt(layout.margin_mm),
            gap_pt: mm_to_pt(layout.gap_mm),
            header_height_pt: mm_to_pt(layout.header_height_mm),
            card_width_pt: mm_to_pt(layout.card_width_mm()),
            card_height_pt,
            card_padding_pt,
            line_height_pt,
            font_size_pt,
            columns: layout.columns as usize,
            cards_per_page: layout.cards_per_page(),
        }
    }

    /// 総ページ数（0件でもタイトルだけの1ページ）
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.cards_per_page).max(1)
    }

    /// スロットの左上座標（pt）
    pub fn slot_origin_pt(&self, slot: usize) -> (f32, f32) {
        let col = slot % self.columns;
        let row = slot / self.columns;
        let x = self.margin_pt + col as f32 * (self.card_width_pt + self.gap_pt);
        let top = self.page_height_pt
            - self.margin_pt
            - self.header_height_pt
            - row as f32 * (self.card_height_pt + self.gap_pt);
        (x, top)
    }

    /// カード内n行目のベースラインY座標（pt）
    pub fn line_y_pt(&self, card_top: f32, line: usize) -> f32 {
        card_top - self.card_padding_pt - (line as f32 + 1.0) * self.line_height_pt
    }

    /// タイトルのベースラインY座標（pt）
    pub fn title_y_pt(&self) -> f32 {
        self.page_height_pt - self.margin_pt - self.header_height_pt * 0.6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 明細形式カードの行数
    const DETAILED_LINES: usize = 32;

    #[test]
    fn test_slot_positions() {
        let core = PrintLayoutCore::from_layout(&PrintLayout::default(), DETAILED_LINES);
        let (x0, y0) = core.slot_origin_pt(0);
        let (x1, y1) = core.slot_origin_pt(1);
        let (x2, y2) = core.slot_origin_pt(2);

        assert!(x1 > x0);
        assert_eq!(y0, y1);
        assert_eq!(x2, x0);
        assert!(y2 < y0);
    }

    #[test]
    fn test_cards_fit_on_page() {
        let core = PrintLayoutCore::from_layout(&PrintLayout::default(), DETAILED_LINES);
        let (_, top) = core.slot_origin_pt(core.cards_per_page - 1);
        let bottom = top - core.card_height_pt;
        assert!(bottom >= core.margin_pt - 0.01);
        let last_line = core.line_y_pt(top, DETAILED_LINES - 1);
        assert!(last_line >= bottom);
    }

    #[test]
    fn test_page_count() {
        let core = PrintLayoutCore::from_layout(&PrintLayout::default(), DETAILED_LINES);
        assert_eq!(core.page_count(0), 1);
        assert_eq!(core.page_count(4), 1);
        assert_eq!(core.page_count(23), 6);
    }

    #[test]
    fn test_shorter_cards_get_taller_lines() {
        let detailed = PrintLayoutCore::from_layout(&PrintLayout::grid(2, 3), DETAILED_LINES);
        let aggregate = PrintLayoutCore::from_layout(&PrintLayout::grid(2, 3), 19);
        assert!(aggregate.line_height_pt > detailed.line_height_pt);

        let empty = PrintLayoutCore::from_layout(&PrintLayout::default(), 0);
        assert!(empty.line_height_pt.is_finite());
    }

    #[test]
    fn test_font_size_capped() {
        let core = PrintLayoutCore::from_layout(&PrintLayout::grid(1, 1), DETAILED_LINES);
        assert!(core.font_size_pt <= MAX_FONT_SIZE_PT);
    }
}
