use crate::error::{PayslipError, Result};
use payslip_common::layout::DEFAULT_COMPANY_NAME;
use payslip_common::pagination::DEFAULT_ITEMS_PER_PAGE;
use payslip_common::{PrintLayout, SchemaMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 会社名の環境変数（設定ファイルより優先）
pub const COMPANY_NAME_ENV: &str = "PAYSLIP_COMPANY_NAME";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub company_name: String,
    pub items_per_page: usize,
    pub schema: SchemaMode,
    pub print_columns: u8,
    pub print_rows: u8,
    /// 空セルに入れる値（0 = シート読み込み時の既定値）
    pub missing_cell_default: f64,
    /// 印刷PDFに埋め込むTrueType/OpenTypeフォント（未設定ならHelvetica）
    pub font_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.into(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            schema: SchemaMode::Auto,
            print_columns: 2,
            print_rows: 2,
            missing_cell_default: 0.0,
            font_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 読み込めなければ既定値で続行（壊れた設定を `config` コマンドで直せるように）
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                tracing::warn!(error = %e, "config path unavailable");
                Self::default()
            }
        }
    }

    pub fn load_or_default_from(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            tracing::warn!(path = %config_path.display(), error = %e, "config unreadable, using defaults");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PayslipError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("payslip-gen").join("config.json"))
    }

    /// 表示用の会社名
    pub fn company_name(&self) -> String {
        // 環境変数を優先
        match std::env::var(COMPANY_NAME_ENV) {
            Ok(name) if !name.trim().is_empty() => name,
            _ => self.company_name.clone(),
        }
    }

    pub fn set_company_name(&mut self, name: String) -> Result<()> {
        if name.trim().is_empty() {
            return Err(PayslipError::Config("会社名が空です".into()));
        }
        self.company_name = name;
        Ok(())
    }

    pub fn set_items_per_page(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(PayslipError::Config("1ページあたりの件数は1以上にしてください".into()));
        }
        self.items_per_page = n;
        Ok(())
    }

    pub fn set_font_path(&mut self, path: PathBuf) -> Result<()> {
        if !path.is_file() {
            return Err(PayslipError::Config(format!("フォントファイルが見つかりません: {}", path.display())));
        }
        self.font_path = Some(path);
        Ok(())
    }

    pub fn print_layout(&self) -> Result<PrintLayout> {
        self.print_layout_with(None, None)
    }

    /// CLIの指定を優先して印刷レイアウトを作る
    pub fn print_layout_with(&self, columns: Option<u8>, rows: Option<u8>) -> Result<PrintLayout> {
        let layout = PrintLayout::try_grid(
            columns.unwrap_or(self.print_columns),
            rows.unwrap_or(self.print_rows),
        )?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.company_name, "ABC Technology Co., Ltd");
        assert_eq!(config.items_per_page, 10);
        assert_eq!(config.schema, SchemaMode::Auto);
        assert_eq!(config.print_layout().unwrap().cards_per_page(), 4);
        assert!(config.font_path.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("none.json")).expect("読み込み失敗");
        assert_eq!(config.items_per_page, 10);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_company_name("Golden Myanmar Co.".into()).unwrap();
        config.set_items_per_page(5).unwrap();
        config.schema = SchemaMode::Aggregate;
        config.save_to(&path).expect("保存失敗");

        let loaded = Config::load_from(&path).expect("読み込み失敗");
        assert_eq!(loaded.company_name, "Golden Myanmar Co.");
        assert_eq!(loaded.items_per_page, 5);
        assert_eq!(loaded.schema, SchemaMode::Aggregate);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"company_name": "XYZ"}"#).unwrap();

        let config = Config::load_from(&path).expect("読み込み失敗");
        assert_eq!(config.company_name, "XYZ");
        assert_eq!(config.items_per_page, 10);
        assert_eq!(config.print_columns, 2);
    }

    #[test]
    fn test_malformed_file_falls_back_to_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load_from(&path), Err(PayslipError::JsonParse(_))));
        let config = Config::load_or_default_from(&path);
        assert_eq!(config.company_name, "ABC Technology Co., Ltd");

        // 既定値から設定し直して上書きできる
        let mut config = config;
        config.set_items_per_page(20).unwrap();
        config.save_to(&path).expect("保存失敗");
        assert_eq!(Config::load_from(&path).unwrap().items_per_page, 20);
    }

    #[test]
    fn test_set_font_path_requires_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut config = Config::default();
        assert!(matches!(config.set_font_path(dir.path().join("none.ttf")), Err(PayslipError::Config(_))));
        assert!(config.font_path.is_none());

        let font = dir.path().join("font.ttf");
        std::fs::write(&font, b"dummy").unwrap();
        config.set_font_path(font.clone()).unwrap();
        assert_eq!(config.font_path, Some(font));
    }

    #[test]
    fn test_print_layout_override_and_validation() {
        let config = Config::default();
        let layout = config.print_layout_with(Some(1), Some(3)).unwrap();
        assert_eq!(layout.cards_per_page(), 3);

        assert!(matches!(config.print_layout_with(Some(255), None), Err(PayslipError::Config(_))));

        let broken = Config { print_rows: 200, ..Config::default() };
        assert!(matches!(broken.print_layout(), Err(PayslipError::Config(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        assert!(matches!(config.set_items_per_page(0), Err(PayslipError::Config(_))));
        assert!(matches!(config.set_company_name("  ".into()), Err(PayslipError::Config(_))));
        assert_eq!(config.items_per_page, 10);
    }
}
