//! Payslip Common Library
//!
//! 給与明細の型・正規化・レイアウト（I/Oなし）

pub mod types;
pub mod normalizer;
pub mod date;
pub mod pagination;
pub mod layout;
pub mod error;
pub mod export;

pub use types::{CellValue, RawRow};
pub use normalizer::{
    normalize_row, normalize_rows, NormalizedRecord, PayrollTotals, RecordTotals, Schema,
    SchemaMode,
};
pub use pagination::Paginator;
pub use layout::PrintLayout;
pub use export::card_core::{build_card, PayslipCard};
pub use error::{Error, Result};
