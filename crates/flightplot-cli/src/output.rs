use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotly::Plot;

use crate::args::OutputFormat;

/// Writes `<dir>/<name>.<ext>` and returns the path written.
pub fn write_figure(dir: &Path, name: &str, plot: &Plot, format: OutputFormat) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{name}.{}", format.extension()));

    let body = match format {
        OutputFormat::Json => plot.to_json(),
        OutputFormat::Html => plot.to_html(),
    };
    std::fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote figure");
    Ok(path)
}
