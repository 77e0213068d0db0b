use clap::{Args, Parser, Subcommand};
use payslip_common::SchemaMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "payslip")]
#[command(about = "Excel給与データから給与明細を表示・印刷するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 給与データ読み込みの共通オプション
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// 給与データ（.xlsx / .xls / .ods、先頭シートのみ）
    #[arg(required = true)]
    pub file: PathBuf,

    /// 列スキーマ (auto/detailed/aggregate)
    #[arg(long)]
    pub schema: Option<SchemaMode>,

    /// 会社名（設定より優先）
    #[arg(long)]
    pub company: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 指定ページの給与明細を表示
    Show {
        #[command(flatten)]
        load: LoadArgs,

        /// ページ番号（1始まり）
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// 1ページあたりの件数
        #[arg(long)]
        per_page: Option<usize>,
    },

    /// 対話的にページ送り・印刷
    Browse {
        #[command(flatten)]
        load: LoadArgs,

        /// 1ページあたりの件数
        #[arg(long)]
        per_page: Option<usize>,

        /// 印刷PDFの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 印刷PDFに埋め込むフォントファイル（.ttf / .otf）
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// 全員分の給与明細を印刷用PDFに出力
    Print {
        #[command(flatten)]
        load: LoadArgs,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドキュメントタイトル
        #[arg(short, long, default_value = "Payslips")]
        title: String,

        /// 横方向のカード数
        #[arg(long)]
        columns: Option<u8>,

        /// 縦方向のカード数
        #[arg(long)]
        rows: Option<u8>,

        /// 埋め込むフォントファイル（.ttf / .otf、非ラテン文字の名前に必要）
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// 正規化済みレコードをExcelに出力
    Export {
        #[command(flatten)]
        load: LoadArgs,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 正規化済みレコードをJSONで出力
    Json {
        #[command(flatten)]
        load: LoadArgs,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 入力フォーマットのテンプレートExcelを出力
    Template {
        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 列スキーマ (detailed/aggregate)
        #[arg(long, default_value = "detailed")]
        schema: SchemaMode,
    },

    /// 設定を表示/編集
    Config {
        /// 会社名を設定
        #[arg(long)]
        set_company: Option<String>,

        /// 1ページあたりの件数を設定
        #[arg(long)]
        set_per_page: Option<usize>,

        /// 既定の列スキーマを設定
        #[arg(long)]
        set_schema: Option<SchemaMode>,

        /// 印刷用フォントファイルを設定
        #[arg(long)]
        set_font: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
