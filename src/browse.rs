//! 対話式ページ送り
//!
//! 前へ / 次へ / 全件印刷 / 終了 を選択しながら給与明細を閲覧する。
//! 全件印刷は現在ページに関係なく全レコードを出力し、表示状態は変えない。

use crate::error::{PayslipError, Result};
use crate::export::{pdf, text};
use crate::session::Session;
use dialoguer::Select;
use payslip_common::PrintLayout;
use std::path::PathBuf;

/// 対話アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Prev,
    Next,
    PrintAll,
    Quit,
}

impl BrowseAction {
    pub const ALL: [BrowseAction; 4] = [
        BrowseAction::Prev,
        BrowseAction::Next,
        BrowseAction::PrintAll,
        BrowseAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BrowseAction::Prev => "Prev",
            BrowseAction::Next => "Next",
            BrowseAction::PrintAll => "Print All",
            BrowseAction::Quit => "Quit",
        }
    }
}

/// 印刷設定
#[derive(Debug, Clone)]
pub struct PrintTarget {
    pub output_path: PathBuf,
    pub title: String,
    pub layout: PrintLayout,
    /// 埋め込みフォント（未指定ならHelvetica）
    pub font_path: Option<PathBuf>,
}

/// ページ送りを適用（印刷・終了はページを変えない）
pub fn apply_action(session: &mut Session, action: BrowseAction) -> usize {
    match action {
        BrowseAction::Prev => session.prev_page(),
        BrowseAction::Next => session.next_page(),
        BrowseAction::PrintAll | BrowseAction::Quit => session.current_page(),
    }
}

/// 対話式で閲覧
pub fn run_interactive_browse(session: &mut Session, company_name: &str, target: &PrintTarget) -> Result<()> {
    if session.is_empty() {
        println!("表示するレコードがありません");
        return Ok(());
    }

    let labels: Vec<&str> = BrowseAction::ALL.iter().map(|a| a.label()).collect();

    loop {
        println!("\n{}\n", text::render_page(session, company_name));

        let selection = Select::new()
            .with_prompt(format!("[{}] 操作を選択", text::page_indicator(session)))
            .items(&labels)
            .default(1)
            .interact()
            .map_err(|e| PayslipError::Prompt(e.to_string()))?;

        let action = BrowseAction::ALL[selection];
        match action {
            BrowseAction::Quit => break,
            BrowseAction::PrintAll => {
                println!("- 印刷用PDFを生成中... ({}件)", session.all_records().len());
                pdf::generate_pdf(
                    session.all_records(),
                    &target.output_path,
                    company_name,
                    &target.title,
                    &target.layout,
                    target.font_path.as_deref(),
                )?;
                println!("✔ PDF出力: {}", target.output_path.display());
            }
            BrowseAction::Prev | BrowseAction::Next => {
                apply_action(session, action);
            }
        }
    }

    Ok(())
}
