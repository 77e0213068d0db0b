//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを作り、ファイルに書き出す

use crate::error::{PayslipError, Result};
use payslip_common::export::excel_core::{generate_records_buffer, generate_template_buffer};
use payslip_common::{NormalizedRecord, Schema};
use std::path::Path;

/// 正規化済みレコード（元の列 + 導出列）をExcelに出力
pub fn generate_excel(records: &[NormalizedRecord], output_path: &Path) -> Result<()> {
    let buffer = generate_records_buffer(records)?;
    std::fs::write(output_path, buffer)
        .map_err(|e| PayslipError::ExcelGeneration(format!("Excel保存エラー: {}", e)))?;
    Ok(())
}

/// 入力フォーマットのテンプレートを出力
pub fn generate_template(schema: Schema, output_path: &Path) -> Result<()> {
    let buffer = generate_template_buffer(schema)?;
    std::fs::write(output_path, buffer)
        .map_err(|e| PayslipError::ExcelGeneration(format!("Excel保存エラー: {}", e)))?;
    Ok(())
}
