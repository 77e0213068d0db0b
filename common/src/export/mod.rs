//! Export core modules shared by the CLI renderers.

pub mod card_core;
pub mod pdf_core;

#[cfg(feature = "excel")]
pub mod excel_core;
