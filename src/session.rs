//! 表示セッション
//!
//! 読み込んだレコード一覧と現在ページを保持する。新しいファイルを読み込むと
//! レコード一覧は丸ごと置き換わる（マージしない）。

use crate::error::Result;
use crate::reader::{self, ReaderOptions};
use payslip_common::{NormalizedRecord, Paginator, SchemaMode};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Session {
    records: Vec<NormalizedRecord>,
    current_page: usize,
    paginator: Paginator,
    /// 置き換え回数（最後に完了した読み込みが勝つ）
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(payslip_common::pagination::DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Session {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            records: Vec::new(),
            current_page: 1,
            paginator: Paginator::new(items_per_page),
            generation: 0,
        }
    }

    /// ファイルを読み込んでレコード一覧を置き換える
    pub async fn load(&mut self, path: &Path, options: ReaderOptions, mode: SchemaMode) -> Result<usize> {
        let records = reader::read_records(path, options, mode).await?;
        let count = records.len();
        self.replace(records);
        Ok(count)
    }

    /// レコード一覧を置き換え、1ページ目に戻す
    pub fn replace(&mut self, records: Vec<NormalizedRecord>) -> u64 {
        self.records = records;
        self.current_page = 1;
        self.generation += 1;
        tracing::debug!(generation = self.generation, records = self.records.len(), "session replaced");
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn per_page(&self) -> usize {
        self.paginator.per_page()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.paginator.page_count(self.records.len())
    }

    /// 印刷用（現在ページに関係なく全件）
    pub fn all_records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    /// 現在ページのレコード
    pub fn current_records(&self) -> &[NormalizedRecord] {
        self.paginator.page_slice(&self.records, self.current_page)
    }

    /// 指定ページへ移動（範囲外は丸める）
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current_page = self.paginator.clamp_page(page, self.records.len());
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.go_to(self.current_page.saturating_sub(1))
    }

    /// 現在ページ内の先頭レコードの通し番号（1始まり、0件なら0）
    pub fn first_index_on_page(&self) -> usize {
        if self.records.is_empty() {
            0
        } else {
            self.paginator.page_range(self.current_page, self.records.len()).start + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payslip_common::{normalize_rows, RawRow};

    fn records(n: usize) -> Vec<NormalizedRecord> {
        let rows: Vec<RawRow> = (0..n)
            .map(|i| RawRow::new().with("EmployeeID", format!("E{:03}", i)).with("BasicSalary", 1000.0))
            .collect();
        normalize_rows(&rows, SchemaMode::Auto)
    }

    #[test]
    fn test_pages_with_23_records() {
        let mut session = Session::new(10);
        session.replace(records(23));

        assert_eq!(session.page_count(), 3);
        assert_eq!(session.current_records().len(), 10);
        session.go_to(3);
        assert_eq!(session.current_records().len(), 3);
        assert_eq!(session.current_records()[0].row.display("EmployeeID"), "E020");
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut session = Session::new(10);
        session.replace(records(23));

        assert_eq!(session.prev_page(), 1);
        assert_eq!(session.next_page(), 2);
        assert_eq!(session.next_page(), 3);
        assert_eq!(session.next_page(), 3);
    }

    #[test]
    fn test_replace_resets_page_and_discards_previous() {
        let mut session = Session::new(10);
        session.replace(records(23));
        session.go_to(3);

        let generation = session.replace(records(4));
        assert_eq!(generation, 2);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.len(), 4);
        assert_eq!(session.page_count(), 1);
    }

    #[test]
    fn test_last_load_wins() {
        // 読み込みが前後して完了しても、最後に完了した一覧が残る
        let mut session = Session::new(10);
        let newer = records(2);
        let older = records(7);
        session.replace(newer);
        session.replace(older);
        assert_eq!(session.len(), 7);
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_all_records_ignores_current_page() {
        let mut session = Session::new(10);
        session.replace(records(23));
        session.go_to(2);
        assert_eq!(session.all_records().len(), 23);
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn test_empty_session() {
        let mut session = Session::new(10);
        assert!(session.is_empty());
        assert_eq!(session.page_count(), 0);
        assert!(session.current_records().is_empty());
        assert_eq!(session.next_page(), 1);
        assert_eq!(session.first_index_on_page(), 0);
    }
}
