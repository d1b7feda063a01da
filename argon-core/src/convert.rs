use crate::{
    dispatch::WorkerId,
    paths::RASTER_EXTENSION,
    plan::WorkUnit,
    tools::{ExitStatus, ToolCapabilities},
};
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::TempPath;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to create output directory {}", .0.display())]
    CreateDir(PathBuf, #[source] std::io::Error),
    #[error("failed to create temporary file in {}", .0.display())]
    TempFile(PathBuf, #[source] std::io::Error),
    #[error("failed to start {0}")]
    Spawn(String, #[source] std::io::Error),
    #[error("{tool} {} while rendering {}{}", .status.message(), .source_file.display(), stderr_suffix(.stderr))]
    Rasterize {
        tool: String,
        status: ExitStatus,
        source_file: PathBuf,
        stderr: String,
    },
    #[error("{tool} produced no output for {}", .source_file.display())]
    EmptyOutput { tool: String, source_file: PathBuf },
    #[error("failed to publish {}", .0.display())]
    Publish(PathBuf, #[source] std::io::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    match stderr.lines().last() {
        Some(line) if !line.trim().is_empty() => format!(": {}", line.trim()),
        _ => String::new(),
    }
}

/// Renders work units with the probed tools.
#[derive(Debug, Clone)]
pub struct Converter {
    tools: Arc<ToolCapabilities>,
}

impl Converter {
    pub fn new(tools: Arc<ToolCapabilities>) -> Self {
        Converter { tools }
    }

    /// Renders `unit` into a temporary file next to its destination, then
    /// renames it into place. The destination is never observed half-written.
    #[tracing::instrument(level = "debug", skip_all, fields(worker = %worker, source = %unit.source.display()))]
    pub async fn convert(&self, unit: &WorkUnit, worker: WorkerId) -> Result<(), ConvertError> {
        let dir = unit
            .destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        // create_dir_all succeeds if a sibling worker created it first
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ConvertError::CreateDir(dir.to_owned(), e))?;

        let temp = temp_path(dir, worker)?;
        tracing::info!(
            "processing {} -> {}",
            unit.source.display(),
            unit.destination.display()
        );
        self.rasterize(unit, &temp).await?;
        self.optimize(&temp).await;

        temp.persist(&unit.destination)
            .map_err(|e| ConvertError::Publish(unit.destination.clone(), e.error))?;
        Ok(())
    }

    async fn rasterize(&self, unit: &WorkUnit, temp: &Path) -> Result<(), ConvertError> {
        let rasterizer = &self.tools.rasterizer;
        let mut export = OsString::from(self.tools.export_flag.flag());
        export.push("=");
        export.push(temp);
        let height = unit.render.height().to_string();

        let finished = rasterizer
            .run([
                export.as_os_str(),
                OsStr::new("-h"),
                OsStr::new(&height),
                unit.source.as_os_str(),
            ])
            .await
            .map_err(|e| ConvertError::Spawn(rasterizer.name(), e))?;
        if !finished.status.success() {
            return Err(ConvertError::Rasterize {
                tool: rasterizer.name(),
                status: finished.status,
                source_file: unit.source.clone(),
                stderr: finished.stderr,
            });
        }
        // some export errors still exit 0, leaving the temp file empty
        match tokio::fs::metadata(temp).await {
            Ok(metadata) if metadata.len() > 0 => Ok(()),
            _ => Err(ConvertError::EmptyOutput {
                tool: rasterizer.name(),
                source_file: unit.source.clone(),
            }),
        }
    }

    /// Compresses `temp` in place. Failures only cost file size, so they are
    /// reported without failing the unit.
    async fn optimize(&self, temp: &Path) {
        let optimizer = match &self.tools.optimizer {
            Some(optimizer) => optimizer,
            None => return,
        };
        tracing::debug!("compressing {}", temp.display());
        match optimizer
            .run([
                OsStr::new("-quiet"),
                OsStr::new("-strip"),
                OsStr::new("all"),
                OsStr::new("-nc"),
                temp.as_os_str(),
            ])
            .await
        {
            Ok(finished) if finished.status.success() => {}
            Ok(finished) => tracing::warn!(
                "{} {} on {}, keeping it uncompressed",
                optimizer.name(),
                finished.status.message(),
                temp.display()
            ),
            Err(e) => tracing::warn!("failed to start {}: {}", optimizer.name(), e),
        }
    }
}

/// Creates an empty, uniquely named file for `worker` in `dir`. The file is
/// deleted again when the returned path is dropped without being persisted.
fn temp_path(dir: &Path, worker: WorkerId) -> Result<TempPath, ConvertError> {
    tempfile::Builder::new()
        .prefix(&format!(".argon-w{}-", worker))
        .suffix(&format!(".{}", RASTER_EXTENSION))
        .tempfile_in(dir)
        .map(|file| file.into_temp_path())
        .map_err(|e| ConvertError::TempFile(dir.to_owned(), e))
}
