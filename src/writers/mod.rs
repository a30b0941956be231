pub mod chart_renderer;
pub mod csv_exporter;

pub use chart_renderer::{ChartRenderer, RenderedChart};
pub use csv_exporter::CsvExporter;

use crate::error::{ProcessingError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Output files held as temporaries next to their destinations until
/// `commit`. Dropping without committing removes every temporary.
#[derive(Default)]
pub struct StagedOutput {
    files: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents)?;
        temp.flush()?;

        self.files.push((temp, path.to_path_buf()));
        Ok(())
    }

    /// Rename every staged file into place, in staging order.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.files.len());
        for (temp, path) in self.files {
            temp.persist(&path).map_err(|e| ProcessingError::Io(e.error))?;
            written.push(path);
        }

        if !written.is_empty() {
            info!(files = written.len(), "outputs written");
        }
        Ok(written)
    }
}
