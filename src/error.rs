use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayslipError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していないファイル形式です（.xlsx / .xls / .ods を選択してください）: {0}")]
    UnsupportedFile(String),

    #[error("シートにデータがありません: {0}")]
    EmptySheet(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("読み込みタスクエラー: {0}")]
    Task(String),
}

/// 共通ライブラリのエラーを対応する種類に振り分ける
impl From<payslip_common::Error> for PayslipError {
    fn from(e: payslip_common::Error) -> Self {
        match e {
            payslip_common::Error::Config(msg) => PayslipError::Config(msg),
            payslip_common::Error::Xlsx(msg) => PayslipError::ExcelGeneration(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, PayslipError>;
