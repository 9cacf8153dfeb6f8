/// One decoded input image at a single resolution. The pixel buffer is
/// tightly packed RGBA8, row-major, no stride padding. Constructed once per
/// build and only ever read afterwards.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub id: String,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SourceImage {
    pub fn new(id: String, pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            id,
            pixels,
            width,
            height,
        }
    }
}

/// Where one source image lands on the atlas canvas. `x`/`y` are the top-left
/// offset; rects produced by one packing never overlap, padding included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRect {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Density tag for one atlas build: the base build is tagged 1, the
/// doubled-resolution build 2. Also decides the output file suffix
/// (`sprite.png` vs `sprite@2x.png`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelRatio {
    One,
    Two,
}

impl PixelRatio {
    pub fn as_u8(self) -> u8 {
        match self {
            PixelRatio::One => 1,
            PixelRatio::Two => 2,
        }
    }

    pub fn file_suffix(self) -> &'static str {
        match self {
            PixelRatio::One => "",
            PixelRatio::Two => "@2x",
        }
    }
}
