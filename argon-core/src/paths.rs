use crate::resolution::Resolution;
use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
};

pub const VECTOR_EXTENSION: &str = "svg";
pub const RASTER_EXTENSION: &str = "png";
const SOURCE_SEGMENT: &str = "svg";

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("{} is not an svg file", .0.display())]
    NotVectorFile(PathBuf),
    #[error("{} is not inside an svg directory", .0.display())]
    NoSourceSegment(PathBuf),
}

/// Computes where the raster version of `input` lives for `resolution`.
///
/// `assets/svg/icons/app/example.svg` at 48 becomes
/// `assets/icons/app/48px/example.png`: the extension is swapped, the first
/// `svg` directory is dropped and a `<resolution>px` directory is inserted
/// before the file name.
pub fn derive_path(input: &Path, resolution: Resolution) -> Result<PathBuf, PathError> {
    let file_name = input
        .file_name()
        .filter(|_| input.extension() == Some(OsStr::new(VECTOR_EXTENSION)))
        .ok_or_else(|| PathError::NotVectorFile(input.to_owned()))?;
    let parent = input.parent().unwrap_or_else(|| Path::new(""));

    let mut found_segment = false;
    let mut output = PathBuf::new();
    for component in parent.components() {
        match component {
            Component::Normal(name) if !found_segment && name == SOURCE_SEGMENT => {
                found_segment = true;
            }
            other => output.push(other),
        }
    }
    if !found_segment {
        return Err(PathError::NoSourceSegment(input.to_owned()));
    }

    output.push(format!("{}px", resolution));
    output.push(file_name);
    output.set_extension(RASTER_EXTENSION);
    Ok(output)
}
