//! Turns command line paths into an ordered list of pages, expanding directories into the image
//! files they contain.
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File types picked up when a directory is given as input
pub const IMAGE_FILE_TYPES: &[&str] = &[
  "jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff",
];

/// One image to OCR and the page number it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInput {
  pub page: u32,
  pub path: PathBuf,
}

pub fn is_image_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|e| e.to_str())
    .map(|e| IMAGE_FILE_TYPES.contains(&e.to_ascii_lowercase().as_str()))
    .unwrap_or(false)
}

/// Resolves `paths` into pages numbered from `first_page` in argument order.
///
/// Files named explicitly are taken as is, whatever their extension. Directories are walked
/// recursively and contribute their image files sorted by path; hidden entries are skipped.
pub fn collect_pages(paths: &[PathBuf], first_page: u32) -> Result<Vec<PageInput>> {
  let mut files = Vec::new();

  for path in paths {
    let metadata = std::fs::metadata(path)
      .with_context(|| format!("Cannot read input {}", path.display()))?;

    if metadata.is_dir() {
      let mut found: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name().to_str()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_image_file(e.path()))
        .map(|e| e.into_path())
        .collect();
      found.sort();
      files.extend(found);
    } else {
      files.push(path.clone());
    }
  }

  if files.is_empty() {
    bail!("No image files found in the given inputs");
  }

  files
    .into_iter()
    .enumerate()
    .map(|(i, path)| -> Result<PageInput> {
      let offset = u32::try_from(i).context("Too many input files")?;
      let page = first_page
        .checked_add(offset)
        .context("Page number overflow")?;
      Ok(PageInput { page, path })
    })
    .collect()
}

fn is_hidden(name: Option<&str>) -> bool {
  name.map(|n| n.starts_with('.')).unwrap_or(false)
}
