pub mod columns;
pub mod indicators;
pub mod parse;
pub mod trends;

use carbonscope_core::config::load_options as load_options_file;
use carbonscope_core::error::EngineError;
use carbonscope_core::upload::{validate_upload, UploadMeta};
use carbonscope_core::EngineOptions;
use std::path::Path;
use tracing::debug;

/// Options from `--config` (or defaults), with command-line overrides applied.
pub fn load_options(config: Option<&Path>, default_year: Option<i32>) -> Result<EngineOptions, EngineError> {
    let mut options = match config {
        Some(path) => load_options_file(path)?,
        None => EngineOptions::default(),
    };
    if default_year.is_some() {
        options.default_year = default_year;
        carbonscope_core::config::validate_options(&options)?;
    }
    debug!(?options, "engine options");
    Ok(options)
}

/// Read a workbook from disk after the same checks an upload would get.
pub fn read_workbook(path: &Path) -> Result<Vec<u8>, EngineError> {
    let size = std::fs::metadata(path)?.len();
    let meta = UploadMeta {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size,
        content_type: String::new(),
    };
    validate_upload(&meta)?;
    Ok(std::fs::read(path)?)
}
