pub mod pdf;
pub mod excel;
pub mod text;

use crate::error::Result;
use payslip_common::NormalizedRecord;
use std::path::{Path, PathBuf};

/// 出力先がディレクトリ（または拡張子なし）ならファイル名を補う
pub fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

/// 正規化済みレコードをJSONで出力
pub fn write_json(records: &[NormalizedRecord], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(output_path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_for_directory() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = output_path_for_format(dir.path(), "payslips", "pdf");
        assert_eq!(path, dir.path().join("payslips.pdf"));
    }

    #[test]
    fn test_output_path_for_file() {
        let path = output_path_for_format(Path::new("out/jan.xlsx"), "payslips", "xlsx");
        assert_eq!(path, PathBuf::from("out/jan.xlsx"));
    }
}
