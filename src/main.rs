use anyhow::Context;
use clap::Parser;
use payslip_common::{CellValue, Schema, SchemaMode};
use payslip_gen::{browse, cli, config, export, logging, reader, session};
use cli::{Cli, Commands, LoadArgs};
use config::Config;
use export::{excel, output_path_for_format, pdf, text};
use reader::ReaderOptions;
use session::Session;
use std::path::{Path, PathBuf};

/// 入力ファイル名（拡張子なし）を出力ファイル名に使う
fn default_stem(file: &Path) -> String {
    file.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("payslips")
        .to_string()
}

fn company_name(load: &LoadArgs, config: &Config) -> String {
    load.company.clone().unwrap_or_else(|| config.company_name())
}

/// 給与データを読み込んでセッションを作る
async fn load_session(load: &LoadArgs, per_page: Option<usize>, config: &Config, announce: bool) -> anyhow::Result<Session> {
    let mode = load.schema.unwrap_or(config.schema);
    let options = ReaderOptions {
        missing_cell: CellValue::Number(config.missing_cell_default),
    };

    if announce {
        println!("- 給与データを読み込み中... ({})", load.file.display());
    }

    let mut session = Session::new(per_page.unwrap_or(config.items_per_page));
    let count = session
        .load(&load.file, options, mode)
        .await
        .with_context(|| format!("給与データを読み込めません: {}", load.file.display()))?;

    if announce {
        println!("✔ {}件のレコードを読み込み\n", count);
    }
    if count == 0 {
        tracing::warn!(file = %load.file.display(), "no data rows");
    }
    Ok(session)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // 設定コマンドは壊れた設定ファイルでも動かす
    let config = match &cli.command {
        Commands::Config { .. } => Config::load_or_default(),
        _ => Config::load().context("設定ファイルを読み込めません（payslip config で再設定できます）")?,
    };

    match cli.command {
        Commands::Show { load, page, per_page } => {
            let mut session = load_session(&load, per_page, &config, true).await?;
            session.go_to(page);
            println!("{}", text::render_page(&session, &company_name(&load, &config)));
        }

        Commands::Browse { load, per_page, output, font } => {
            let layout = config.print_layout()?;
            let mut session = load_session(&load, per_page, &config, true).await?;
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let target = browse::PrintTarget {
                output_path: output_path_for_format(&output_dir, &default_stem(&load.file), "pdf"),
                title: "Payslips".to_string(),
                layout,
                font_path: font.or_else(|| config.font_path.clone()),
            };
            browse::run_interactive_browse(&mut session, &company_name(&load, &config), &target)?;
        }

        Commands::Print { load, output, title, columns, rows, font } => {
            println!("🖨 payslip - 全件印刷\n");

            let layout = config.print_layout_with(columns, rows)?;
            let session = load_session(&load, None, &config, true).await?;
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let output_path = output_path_for_format(&output_dir, &default_stem(&load.file), "pdf");
            let company = company_name(&load, &config);
            let font = font.or_else(|| config.font_path.clone());

            if font.is_none() && pdf::needs_unicode_font(session.all_records(), &company) {
                println!("⚠ 標準フォントで表示できない文字があります（--font でフォントを指定してください）");
            }

            println!("- 印刷用PDFを生成中... ({}件, 1ページ{}枚)", session.len(), layout.cards_per_page());
            pdf::generate_pdf(
                session.all_records(),
                &output_path,
                &company,
                &title,
                &layout,
                font.as_deref(),
            )?;
            println!("✔ PDF出力: {}", output_path.display());
        }

        Commands::Export { load, output } => {
            let session = load_session(&load, None, &config, true).await?;
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let output_path = output_path_for_format(
                &output_dir,
                &format!("{}-normalized", default_stem(&load.file)),
                "xlsx",
            );

            println!("- Excelを生成中...");
            excel::generate_excel(session.all_records(), &output_path)?;
            println!("✔ Excel出力: {}", output_path.display());
        }

        Commands::Json { load, output } => {
            let announce = output.is_some();
            let session = load_session(&load, None, &config, announce).await?;
            match output {
                Some(path) => {
                    export::write_json(session.all_records(), &path)?;
                    println!("✔ JSON出力: {}", path.display());
                }
                None => {
                    println!("{}", serde_json::to_string_pretty(session.all_records())?);
                }
            }
        }

        Commands::Template { output, schema } => {
            let schema = match schema {
                SchemaMode::Aggregate => Schema::Aggregate,
                SchemaMode::Auto | SchemaMode::Detailed => Schema::Detailed,
            };
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let output_path = output_path_for_format(&output_dir, "payslip-template", "xlsx");

            excel::generate_template(schema, &output_path)?;
            println!("✔ テンプレート出力: {}", output_path.display());
        }

        Commands::Config { set_company, set_per_page, set_schema, set_font, show } => {
            let mut config = config;
            let changed = set_company.is_some()
                || set_per_page.is_some()
                || set_schema.is_some()
                || set_font.is_some();

            if let Some(name) = set_company {
                config.set_company_name(name)?;
            }
            if let Some(n) = set_per_page {
                config.set_items_per_page(n)?;
            }
            if let Some(schema) = set_schema {
                config.schema = schema;
            }
            if let Some(path) = set_font {
                config.set_font_path(path)?;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  会社名: {}", config.company_name());
                println!("  1ページの件数: {}", config.items_per_page);
                println!("  列スキーマ: {}", config.schema);
                println!("  印刷レイアウト: {}×{}", config.print_columns, config.print_rows);
                println!("  空セルの既定値: {}", config.missing_cell_default);
                match &config.font_path {
                    Some(path) => println!("  印刷フォント: {}", path.display()),
                    None => println!("  印刷フォント: (Helvetica)"),
                }
            }
        }
    }

    Ok(())
}
