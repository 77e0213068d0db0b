//! ページ分割
//!
//! 画面表示用の固定件数ページ。ページ番号は1始まり。

use std::ops::Range;

/// 1ページあたりの既定件数
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Paginator {
    /// 0件指定は1件として扱う
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// 総ページ数（0件なら0ページ）
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.per_page)
    }

    /// ページ番号を [1, page_count] に丸める
    pub fn clamp_page(&self, page: usize, total: usize) -> usize {
        page.clamp(1, self.page_count(total).max(1))
    }

    /// 指定ページのインデックス範囲
    pub fn page_range(&self, page: usize, total: usize) -> Range<usize> {
        let page = self.clamp_page(page, total);
        let start = ((page - 1) * self.per_page).min(total);
        let end = (start + self.per_page).min(total);
        start..end
    }

    /// 指定ページのスライス
    pub fn page_slice<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        &items[self.page_range(page, items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_boundary() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.page_count(23), 3);
        assert_eq!(paginator.page_count(20), 2);
        assert_eq!(paginator.page_count(0), 0);
    }

    #[test]
    fn test_last_page_partial() {
        let items: Vec<usize> = (0..23).collect();
        let paginator = Paginator::new(10);
        let page3 = paginator.page_slice(&items, 3);
        assert_eq!(page3.len(), 3);
        assert_eq!(page3, &[20, 21, 22]);
    }

    #[test]
    fn test_page_is_clamped() {
        let items: Vec<usize> = (0..23).collect();
        let paginator = Paginator::new(10);
        assert_eq!(paginator.page_slice(&items, 0), paginator.page_slice(&items, 1));
        assert_eq!(paginator.page_slice(&items, 99), &[20, 21, 22]);
    }

    #[test]
    fn test_empty_items() {
        let items: Vec<usize> = Vec::new();
        let paginator = Paginator::default();
        assert!(paginator.page_slice(&items, 1).is_empty());
        assert_eq!(paginator.clamp_page(5, 0), 1);
    }

    #[test]
    fn test_zero_per_page() {
        assert_eq!(Paginator::new(0).per_page(), 1);
    }
}
