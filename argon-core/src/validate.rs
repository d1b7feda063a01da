//! Structural checks on the source tree, run before anything is rendered.
use crate::plan::{ColourVariant, SOURCE_DIR};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("source root {} doesn't exist", .0.display())]
    MissingRoot(PathBuf),
    #[error("{} is a broken symlink", .0.display())]
    BrokenSymlink(PathBuf),
    #[error("{} has no colourless counterpart at {}", .coloured.display(), .expected.display())]
    MissingColourless { coloured: PathBuf, expected: PathBuf },
    #[error("failed to read source tree")]
    Walk(#[source] walkdir::Error),
}

/// Checks the tree under `root`, stopping at the first problem.
///
/// Fails if `root` is missing, if any symlink below `root/svg` points
/// nowhere, or if a file under the coloured icon tree has no twin under the
/// colourless one.
pub fn validate(root: &Path) -> Result<(), ValidationError> {
    if !root.is_dir() {
        return Err(ValidationError::MissingRoot(root.to_owned()));
    }
    let source_dir = root.join(SOURCE_DIR);
    check_symlinks(&source_dir)?;
    check_colour_parity(
        &source_dir.join(ColourVariant::Coloured.dir_name()),
        &source_dir.join(ColourVariant::Colourless.dir_name()),
    )?;
    tracing::debug!("{} is valid", root.display());
    Ok(())
}

fn sorted_walk(dir: &Path) -> impl Iterator<Item = walkdir::Result<walkdir::DirEntry>> {
    WalkDir::new(dir)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
}

fn check_symlinks(dir: &Path) -> Result<(), ValidationError> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in sorted_walk(dir) {
        let entry = entry.map_err(ValidationError::Walk)?;
        // metadata follows the link, so it fails when the target is gone
        if entry.path_is_symlink() && std::fs::metadata(entry.path()).is_err() {
            return Err(ValidationError::BrokenSymlink(entry.into_path()));
        }
    }
    Ok(())
}

fn check_colour_parity(coloured: &Path, colourless: &Path) -> Result<(), ValidationError> {
    if !coloured.exists() {
        return Ok(());
    }
    for entry in sorted_walk(coloured) {
        let entry = entry.map_err(ValidationError::Walk)?;
        if entry.file_type().is_dir() {
            continue;
        }
        let expected = match entry.path().strip_prefix(coloured) {
            Ok(relative) => colourless.join(relative),
            Err(_) => continue,
        };
        if !expected.exists() {
            return Err(ValidationError::MissingColourless {
                coloured: entry.into_path(),
                expected,
            });
        }
    }
    Ok(())
}
