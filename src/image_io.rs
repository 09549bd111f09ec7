use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::fs;
use image::{ImageFormat, RgbaImage};

use crate::errors::{GrainSizeError, Result};

/// Represents an input image with its metadata
pub struct InputImage {
    pub image: RgbaImage,
    pub path: PathBuf,
    pub filename: String,
}

/// Get all image files with one of `extensions` from a directory (recursively)
///
/// The result is sorted so that per-image seeds are stable between runs.
pub fn get_image_files_in_dir<P: AsRef<Path>>(
    dir_path: P,
    extensions: &[String],
) -> Result<Vec<PathBuf>> {
    let dir_path = dir_path.as_ref();

    if !dir_path.exists() {
        return Err(GrainSizeError::InvalidPath(dir_path.to_path_buf()));
    }

    if !dir_path.is_dir() {
        return Err(GrainSizeError::Config(format!(
            "{} is not a directory", dir_path.display()
        )));
    }

    let mut image_files = Vec::new();
    find_image_files_recursive(dir_path, extensions, &mut image_files)?;
    image_files.sort();

    Ok(image_files)
}

/// Helper function to recursively search for image files
fn find_image_files_recursive(
    dir_path: &Path,
    extensions: &[String],
    result: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in fs::read_dir(dir_path)? {
        let path = entry?.path();

        if path.is_dir() {
            find_image_files_recursive(&path, extensions, result)?;
        } else if path.is_file() && has_extension(&path, extensions) {
            result.push(path);
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Output names for `files`, unique within one run
///
/// A name is the path relative to `root` without its extension, with
/// directory separators replaced by `_` (`a/x.png` becomes `a_x`). Files that
/// would still share a name, like `x.png` and `x.tif`, keep their extension
/// (`x_png`, `x_tif`).
pub fn output_names(root: &Path, files: &[PathBuf]) -> Result<Vec<String>> {
    let bases = files
        .iter()
        .map(|path| relative_stem(root, path))
        .collect::<Result<Vec<_>>>()?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for base in &bases {
        *counts.entry(base.as_str()).or_default() += 1;
    }

    let names: Vec<String> = files
        .iter()
        .zip(&bases)
        .map(|(path, base)| match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if counts[base.as_str()] > 1 => format!("{}_{}", base, ext),
            _ => base.clone(),
        })
        .collect();

    let mut seen = HashSet::new();
    if let Some(duplicate) = names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(GrainSizeError::Config(format!(
            "several input images map to the output name {}", duplicate
        )));
    }

    Ok(names)
}

fn relative_stem(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    let parts = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>();

    match parts {
        Some(parts) if !parts.is_empty() => Ok(parts.join("_")),
        _ => Err(GrainSizeError::InvalidPath(path.to_path_buf())),
    }
}

/// Load an image ensuring RGBA format
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<InputImage> {
    let path = path.as_ref();

    // Get filename without extension
    let filename = path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| GrainSizeError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let image = image::open(path)?.to_rgba8();

    Ok(InputImage {
        image,
        path: path.to_path_buf(),
        filename,
    })
}

/// Save an RGBA image as PNG to the specified path
pub fn save_image<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_utils::filled_image;
    use tempfile::tempdir;

    #[test]
    fn finds_matching_files_recursively() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();

        let img = filled_image(4, 4, [255, 0, 0]);
        save_image(&img, dir.path().join("b.png")).unwrap();
        save_image(&img, nested.join("a.PNG")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = get_image_files_in_dir(dir.path(), &["png".to_string()]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().is_some()));
    }

    #[test]
    fn missing_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            get_image_files_in_dir(&missing, &["png".to_string()]),
            Err(GrainSizeError::InvalidPath(_))
        ));
    }

    #[test]
    fn same_stem_with_different_extensions_gets_distinct_names() {
        let dir = tempdir().unwrap();
        let img = filled_image(4, 4, [255, 0, 0]);
        img.save_with_format(dir.path().join("sample.png"), ImageFormat::Png).unwrap();
        img.save_with_format(dir.path().join("sample.tif"), ImageFormat::Tiff).unwrap();
        save_image(&img, dir.path().join("other.png")).unwrap();

        let extensions = vec!["png".to_string(), "tif".to_string()];
        let files = get_image_files_in_dir(dir.path(), &extensions).unwrap();
        let names = output_names(dir.path(), &files).unwrap();
        assert_eq!(names, vec!["other", "sample_png", "sample_tif"]);
    }

    #[test]
    fn nested_files_are_named_by_relative_path() {
        let root = Path::new("/data/input");
        let files = vec![
            root.join("a").join("x.png"),
            root.join("b").join("x.png"),
            root.join("y.tiff"),
        ];
        let names = output_names(root, &files).unwrap();
        assert_eq!(names, vec!["a_x", "b_x", "y"]);
    }

    #[test]
    fn unresolvable_collision_is_reported() {
        let root = Path::new("/data");
        let files = vec![root.join("a_x.png"), root.join("a").join("x.png")];
        // both reduce to a_x with the same extension
        let err = output_names(root, &files).unwrap_err();
        assert!(matches!(err, GrainSizeError::Config(_)));
    }

    #[test]
    fn single_file_is_named_by_its_stem() {
        let file = PathBuf::from("/data/run/micrograph.png");
        let parent = file.parent().unwrap();
        assert_eq!(output_names(parent, &[file.clone()]).unwrap(), vec!["micrograph"]);
    }

    #[test]
    fn load_returns_rgba_and_stem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.png");
        save_image(&filled_image(5, 3, [10, 20, 30]), &path).unwrap();

        let input = load_image(&path).unwrap();
        assert_eq!(input.filename, "sample");
        assert_eq!(input.image.dimensions(), (5, 3));
        assert_eq!(input.image.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}
