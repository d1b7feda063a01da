use crate::{
    paths::{derive_path, PathError, VECTOR_EXTENSION},
    resolution::{IconType, Resolution},
};
use std::{
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

pub const SOURCE_DIR: &str = "svg";

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ColourVariant {
    Coloured,
    Colourless,
}

impl ColourVariant {
    pub fn dir_name(&self) -> &'static str {
        match self {
            ColourVariant::Coloured => "icons",
            ColourVariant::Colourless => "icons-colourless",
        }
    }
}

impl fmt::Display for ColourVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColourVariant::Coloured => f.write_str("coloured"),
            ColourVariant::Colourless => f.write_str("colourless"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown colour variant '{0}', expected 'coloured' or 'colourless'")]
pub struct UnknownColourVariant(String);

impl FromStr for ColourVariant {
    type Err = UnknownColourVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coloured" | "colored" | "icons" => Ok(ColourVariant::Coloured),
            "colourless" | "colorless" | "icons-colourless" => Ok(ColourVariant::Colourless),
            _ => Err(UnknownColourVariant(s.to_owned())),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct IconClass {
    pub name: String,
    pub icon_type: IconType,
}

impl IconClass {
    pub fn new(name: impl Into<String>, icon_type: IconType) -> Self {
        IconClass {
            name: name.into(),
            icon_type,
        }
    }
}

/// One conversion of a source file to a raster file at one size.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct WorkUnit {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub render: Resolution,
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (h={})",
            self.source.display(),
            self.destination.display(),
            self.render.height()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("source directory {} for '{}' doesn't exist", .0.display(), .1)]
    MissingClassDir(PathBuf, String),
    #[error("failed to list {}", .0.display())]
    ListDir(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(Debug, Clone)]
pub struct Planner {
    source_root: PathBuf,
    build_root: PathBuf,
}

impl Planner {
    pub fn new(source_root: impl Into<PathBuf>, build_root: impl Into<PathBuf>) -> Self {
        Planner {
            source_root: source_root.into(),
            build_root: build_root.into(),
        }
    }

    /// Directory holding the sources of `class`, e.g. `assets/svg/icons/app`.
    pub fn class_dir(&self, class: &IconClass, variant: Option<ColourVariant>) -> PathBuf {
        let mut dir = self.source_root.join(SOURCE_DIR);
        if let Some(variant) = variant {
            dir.push(variant.dir_name());
        }
        dir.join(&class.name)
    }

    pub async fn plan_icon_set(
        &self,
        class: &IconClass,
        variant: Option<ColourVariant>,
        resolution: Resolution,
    ) -> Result<Vec<WorkUnit>, PlanError> {
        let dir = self.class_dir(class, variant);
        if !is_dir(&dir).await {
            return Err(PlanError::MissingClassDir(dir, class.name.clone()));
        }
        let sources = list_vector_files(&dir).await?;
        tracing::debug!(
            "planning {} file(s) from {} at {}",
            sources.len(),
            dir.display(),
            resolution
        );
        sources
            .iter()
            .map(|source| self.work_unit(source, class, resolution))
            .collect()
    }

    pub fn plan_single_icon(
        &self,
        input: &Path,
        class: &IconClass,
        resolutions: &[Resolution],
    ) -> Result<Vec<WorkUnit>, PlanError> {
        resolutions
            .iter()
            .map(|&resolution| self.work_unit(input, class, resolution))
            .collect()
    }

    fn work_unit(
        &self,
        source: &Path,
        class: &IconClass,
        resolution: Resolution,
    ) -> Result<WorkUnit, PlanError> {
        let destination = match source.strip_prefix(&self.source_root) {
            Ok(relative) => self.build_root.join(derive_path(relative, resolution)?),
            Err(_) => derive_path(source, resolution)?,
        };
        Ok(WorkUnit {
            source: source.to_owned(),
            destination,
            render: class.icon_type.render_resolution(resolution),
        })
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// Sorted `*.svg` files directly inside `dir`. Symlinked sources count as
/// files when their target is one.
async fn list_vector_files(dir: &Path) -> Result<Vec<PathBuf>, PlanError> {
    let list_err = |e| PlanError::ListDir(dir.to_owned(), e);
    let mut entries = tokio::fs::read_dir(dir).await.map_err(list_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        let path = entry.path();
        if path.extension() != Some(OsStr::new(VECTOR_EXTENSION)) {
            continue;
        }
        if let Ok(metadata) = tokio::fs::metadata(&path).await {
            if metadata.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}
