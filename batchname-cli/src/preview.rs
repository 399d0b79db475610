use anyhow::Result;
use batchname_core::{preview_operation, write_preview, BatchRequest, OutputFormatter, Preview};

use crate::cli::OutputFormat;

pub fn handle_preview(request: &BatchRequest, format: Preview, use_color: bool, output: OutputFormat) -> Result<()> {
    let result = preview_operation(request, None)?;

    match output {
        OutputFormat::Json => println!("{}", result.format_json()),
        OutputFormat::Summary => write_preview(&result.preview, format, Some(use_color))?,
    }

    Ok(())
}
