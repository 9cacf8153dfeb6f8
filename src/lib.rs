mod assets;
mod canvas;
mod error;
mod metadata;
mod perf;
mod plan;
mod types;

pub use assets::{InputEntry, decode_source_pair, discover_inputs};
pub use canvas::{Canvas, compose, encode_png};
pub use error::SpritePackError;
pub use metadata::atlas_metadata;
pub use plan::{LayoutPlan, estimate_width, pack_shelves};
pub use types::{PixelRatio, PlacementRect, SourceImage};

use perf::PerfLogger;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

// Every atlas carries at least this margin between neighbours and around the
// border; the builder's `padding` is added on top. Matches the original
// spritore tool, whose consumers rely on the 10px bleed guard.
const BASE_PADDING: u32 = 10;

/// One fully built atlas: the composed canvas plus its id → rect mapping.
/// The 1x and 2x builds each get their own, computed independently — the 2x
/// coordinates are not double the 1x ones.
#[derive(Debug)]
pub struct AtlasBuild {
    pub canvas: Canvas,
    pub metadata: serde_json::Value,
}

/// Pure single-resolution pipeline: size, pack, compose, emit. Shares no
/// state across calls, so the 1x and 2x builds can run concurrently.
pub fn build_atlas(
    images: &[SourceImage],
    padding: u32,
    ratio: PixelRatio,
) -> Result<AtlasBuild, SpritePackError> {
    if images.is_empty() {
        return Err(SpritePackError::EmptyInputSet);
    }
    let plan = pack_shelves(images, padding);
    let canvas = compose(images, &plan);
    let metadata = atlas_metadata(&plan.rects, ratio)?;
    Ok(AtlasBuild { canvas, metadata })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateSummary {
    pub image_count: usize,
    pub base_side: u32,
    pub retina_side: u32,
}

#[derive(Clone)]
pub struct SpritePackBuilder {
    padding: u32,
    output_file_name: String,
    perf_path: Option<std::path::PathBuf>,
}

impl Default for SpritePackBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpritePackBuilder {
    pub fn new() -> Self {
        Self {
            padding: 0,
            output_file_name: "sprite".to_string(),
            perf_path: None,
        }
    }

    /// Extra padding on top of the built-in 10px margin.
    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Output base name; artifacts are `{name}.png`, `{name}.json`,
    /// `{name}@2x.png`, `{name}@2x.json`.
    pub fn output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = name.into();
        self
    }

    pub fn perf_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.perf_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SpritePack, SpritePackError> {
        if self.output_file_name.is_empty() {
            return Err(SpritePackError::InvalidConfiguration(
                "output_file_name must not be empty".to_string(),
            ));
        }
        let perf = match self.perf_path {
            Some(path) => Some(Arc::new(PerfLogger::new(path)?)),
            None => None,
        };
        Ok(SpritePack {
            padding: self.padding,
            output_file_name: self.output_file_name,
            perf,
        })
    }
}

#[derive(Debug)]
pub struct SpritePack {
    padding: u32,
    output_file_name: String,
    perf: Option<Arc<PerfLogger>>,
}

impl SpritePack {
    pub fn builder() -> SpritePackBuilder {
        SpritePackBuilder::new()
    }

    /// Run the whole pipeline: discover and decode the input folder, pack
    /// and compose the 1x and 2x atlases, write the four artifacts into the
    /// output folder. Both paths must be absolute.
    pub fn generate(
        &self,
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<GenerateSummary, SpritePackError> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();
        if !input_path.is_absolute() {
            return Err(SpritePackError::InvalidConfiguration(
                "input path must be absolute".to_string(),
            ));
        }
        if !output_path.is_absolute() {
            return Err(SpritePackError::InvalidConfiguration(
                "output path must be absolute".to_string(),
            ));
        }

        let entries = discover_inputs(input_path)?;
        if entries.is_empty() {
            return Err(SpritePackError::EmptyInputSet);
        }
        if let Some(perf) = &self.perf {
            perf.log_count("input.images", entries.len() as u64);
        }

        let (base_images, retina_images) = self.decode_all(&entries)?;
        let padding = BASE_PADDING + self.padding;

        let started = Instant::now();
        let (base, retina) = rayon::join(
            || build_atlas(&base_images, padding, PixelRatio::One),
            || build_atlas(&retina_images, padding, PixelRatio::Two),
        );
        let (base, retina) = (base?, retina?);
        if let Some(perf) = &self.perf {
            perf.log_span_ms("build", None, started.elapsed().as_secs_f64() * 1000.0);
        }

        std::fs::create_dir_all(output_path)?;
        let started = Instant::now();
        self.write_build(&base, PixelRatio::One, output_path)?;
        self.write_build(&retina, PixelRatio::Two, output_path)?;
        if let Some(perf) = &self.perf {
            perf.log_span_ms("write", None, started.elapsed().as_secs_f64() * 1000.0);
            perf.summary();
        }

        Ok(GenerateSummary {
            image_count: entries.len(),
            base_side: base.canvas.side,
            retina_side: retina.canvas.side,
        })
    }

    // Parallel per-image decode+resize, results restored to input order
    // before the first error (if any) is propagated.
    fn decode_all(
        &self,
        entries: &[InputEntry],
    ) -> Result<(Vec<SourceImage>, Vec<SourceImage>), SpritePackError> {
        use rayon::prelude::*;

        let started = Instant::now();
        let mut results: Vec<(usize, Result<(SourceImage, SourceImage), SpritePackError>)> =
            entries
                .par_iter()
                .enumerate()
                .map(|(idx, entry)| (idx, decode_source_pair(entry)))
                .collect();
        results.sort_by_key(|(idx, _)| *idx);

        let mut base_images = Vec::with_capacity(entries.len());
        let mut retina_images = Vec::with_capacity(entries.len());
        for (_, res) in results {
            let (base, retina) = res?;
            base_images.push(base);
            retina_images.push(retina);
        }
        if let Some(perf) = &self.perf {
            perf.log_span_ms("decode", None, started.elapsed().as_secs_f64() * 1000.0);
        }
        Ok((base_images, retina_images))
    }

    fn write_build(
        &self,
        build: &AtlasBuild,
        ratio: PixelRatio,
        output_path: &Path,
    ) -> Result<(), SpritePackError> {
        let suffix = ratio.file_suffix();
        let png = encode_png(&build.canvas)?;
        std::fs::write(
            output_path.join(format!("{}{}.png", self.output_file_name, suffix)),
            png,
        )?;
        let json = serde_json::to_vec(&build.metadata)
            .map_err(|err| SpritePackError::Encode(err.to_string()))?;
        std::fs::write(
            output_path.join(format!("{}{}.json", self.output_file_name, suffix)),
            json,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn png_file(dir: &Path, name: &str, width: u32, height: u32, rgba: [u8; 4]) {
        let mut src = RgbaImage::new(width, height);
        for pixel in src.pixels_mut() {
            *pixel = image::Rgba(rgba);
        }
        let mut bytes = Vec::new();
        src.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        std::fs::write(dir.join(name), bytes).unwrap();
    }

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "spritepack_{}_{}",
            tag,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn solid(id: &str, width: u32, height: u32) -> SourceImage {
        SourceImage::new(
            id.to_string(),
            vec![128u8; (width * height * 4) as usize],
            width,
            height,
        )
    }

    #[test]
    fn build_atlas_rejects_empty_input() {
        let err = build_atlas(&[], 10, PixelRatio::One).unwrap_err();
        assert!(matches!(err, SpritePackError::EmptyInputSet));
    }

    #[test]
    fn build_atlas_metadata_matches_source_dimensions() {
        let images = vec![solid("a", 12, 7), solid("b", 5, 19)];
        let build = build_atlas(&images, 10, PixelRatio::One).unwrap();
        for img in &images {
            let entry = &build.metadata[&img.id];
            assert_eq!(entry["width"], img.width);
            assert_eq!(entry["height"], img.height);
            assert_eq!(entry["pixelRatio"], 1);
        }
    }

    #[test]
    fn builder_rejects_empty_output_name() {
        let err = SpritePack::builder().output_file_name("").build().unwrap_err();
        assert!(matches!(err, SpritePackError::InvalidConfiguration(_)));
    }

    #[test]
    fn generate_rejects_relative_paths() {
        let pack = SpritePack::builder().build().unwrap();
        let absolute = std::env::temp_dir();
        let err = pack.generate("relative/in", &absolute).unwrap_err();
        assert!(matches!(err, SpritePackError::InvalidConfiguration(_)));
        let err = pack.generate(&absolute, "relative/out").unwrap_err();
        assert!(matches!(err, SpritePackError::InvalidConfiguration(_)));
    }

    #[test]
    fn generate_rejects_an_empty_input_folder() {
        let input = temp_dir("empty_in");
        let output = temp_dir("empty_out");
        let pack = SpritePack::builder().build().unwrap();
        let err = pack.generate(&input, &output).unwrap_err();
        assert!(matches!(err, SpritePackError::EmptyInputSet));
        std::fs::remove_dir_all(&input).unwrap();
        std::fs::remove_dir_all(&output).unwrap();
    }

    #[test]
    fn generate_writes_all_four_artifacts() {
        let input = temp_dir("e2e_in");
        let output = temp_dir("e2e_out");
        png_file(&input, "red.png", 3, 2, [255, 0, 0, 255]);
        png_file(&input, "blue.png", 5, 4, [0, 0, 255, 255]);

        let pack = SpritePack::builder().build().unwrap();
        let summary = pack.generate(&input, &output).unwrap();
        assert_eq!(summary.image_count, 2);

        for name in ["sprite.png", "sprite.json", "sprite@2x.png", "sprite@2x.json"] {
            assert!(output.join(name).is_file(), "missing {}", name);
        }

        let base: serde_json::Value =
            serde_json::from_slice(&std::fs::read(output.join("sprite.json")).unwrap()).unwrap();
        let retina: serde_json::Value =
            serde_json::from_slice(&std::fs::read(output.join("sprite@2x.json")).unwrap()).unwrap();

        assert_eq!(base["red"]["width"], 3);
        assert_eq!(base["red"]["height"], 2);
        assert_eq!(base["red"]["pixelRatio"], 1);
        assert_eq!(retina["red"]["width"], 6);
        assert_eq!(retina["red"]["height"], 4);
        assert_eq!(retina["red"]["pixelRatio"], 2);
        assert_eq!(base["blue"]["pixelRatio"], 1);
        assert_eq!(retina["blue"]["pixelRatio"], 2);

        // Default builder padding 0 still applies the built-in 10px margin.
        let blue_x = base["blue"]["x"].as_u64().unwrap();
        let blue_y = base["blue"]["y"].as_u64().unwrap();
        assert!(blue_x >= 10 && blue_y >= 10);

        // Atlas rasters decode back to the sides the builds reported.
        let atlas =
            image::load_from_memory(&std::fs::read(output.join("sprite.png")).unwrap()).unwrap();
        assert_eq!(atlas.width(), summary.base_side);
        assert_eq!(atlas.height(), summary.base_side);
        let atlas2x = image::load_from_memory(&std::fs::read(output.join("sprite@2x.png")).unwrap())
            .unwrap();
        assert_eq!(atlas2x.width(), summary.retina_side);
        assert_eq!(atlas2x.height(), summary.retina_side);

        std::fs::remove_dir_all(&input).unwrap();
        std::fs::remove_dir_all(&output).unwrap();
    }

    #[test]
    fn generate_fails_whole_run_on_one_bad_image() {
        let input = temp_dir("bad_in");
        let output = temp_dir("bad_out");
        png_file(&input, "good.png", 2, 2, [1, 2, 3, 255]);
        std::fs::write(input.join("junk.png"), [0u8, 1, 2]).unwrap();

        let pack = SpritePack::builder().build().unwrap();
        let err = pack.generate(&input, &output).unwrap_err();
        assert!(matches!(err, SpritePackError::Decode { id, .. } if id == "junk"));
        // No partial atlas may be left behind.
        assert!(!output.join("sprite.png").exists());

        std::fs::remove_dir_all(&input).unwrap();
        std::fs::remove_dir_all(&output).unwrap();
    }
}
