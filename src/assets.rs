use crate::error::SpritePackError;
use crate::types::SourceImage;
use image::imageops::FilterType;
use std::collections::HashSet;
use std::path::Path;

/// One discovered input file, undecoded. The id is the file name up to the
/// first `.` (falling back to the full name), which is what keys the metadata
/// document.
#[derive(Debug, Clone)]
pub struct InputEntry {
    pub id: String,
    pub data: Vec<u8>,
}

/// List the input directory, non-recursively. Hidden files and
/// subdirectories are skipped; surviving entries are sorted by file name so
/// repeat runs see the same order. Two files sharing a stem (`a.png` and
/// `a.jpg`) would collide in the metadata mapping and are rejected here.
pub fn discover_inputs(input_path: &Path) -> Result<Vec<InputEntry>, SpritePackError> {
    let mut files: Vec<std::path::PathBuf> = Vec::new();
    for entry in std::fs::read_dir(input_path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();

    let mut seen: HashSet<String> = HashSet::new();
    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        let file_name = path
            .file_name()
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = match file_name.split('.').next() {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => file_name,
        };
        if !seen.insert(id.clone()) {
            return Err(SpritePackError::DuplicateImageId(id));
        }
        let data = std::fs::read(&path)?;
        entries.push(InputEntry { id, data });
    }
    Ok(entries)
}

/// Decode one input into its base and doubled-resolution renditions. Both are
/// normalized to tightly packed RGBA8; the 2x copy is width scaled by exactly
/// 2 with proportional height, Lanczos3 resampled.
pub fn decode_source_pair(
    entry: &InputEntry,
) -> Result<(SourceImage, SourceImage), SpritePackError> {
    let decoded = image::load_from_memory(&entry.data).map_err(|err| SpritePackError::Decode {
        id: entry.id.clone(),
        message: err.to_string(),
    })?;
    let base = decoded.to_rgba8();
    let (width, height) = base.dimensions();
    let retina = image::imageops::resize(&base, width * 2, height * 2, FilterType::Lanczos3);

    let base_image = SourceImage::new(entry.id.clone(), base.into_raw(), width, height);
    let retina_image = SourceImage::new(
        entry.id.clone(),
        retina.into_raw(),
        width * 2,
        height * 2,
    );
    Ok((base_image, retina_image))
}
