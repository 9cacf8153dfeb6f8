use crate::error::SpritePackError;
use crate::plan::LayoutPlan;
use crate::types::SourceImage;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;

/// One square RGBA canvas, zero-initialized (transparent black). The pixel
/// buffer is a flat byte arena addressed by computed offsets; compositing is
/// plain iterative copies, never an overlay/tree primitive, so arbitrarily
/// many images cannot exhaust the stack.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub side: u32,
    pub pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(side: u32) -> Self {
        let len = side as usize * side as usize * 4;
        Self {
            side,
            pixels: vec![0u8; len],
        }
    }

    /// Copy one source image into its placement rect. Pixels are copied
    /// verbatim, alpha included — no blending. Source reads past the end of
    /// the buffer are skipped, leaving those destination pixels transparent;
    /// this guards against a width/height that overstates the buffer after
    /// an external resize.
    fn blit(&mut self, img: &SourceImage, left: u32, top: u32) {
        let side = self.side as usize;
        let width = img.width as usize;
        for y in 0..img.height as usize {
            for x in 0..width {
                let src_offset = (y * width + x) * 4;
                if src_offset + 4 > img.pixels.len() {
                    continue;
                }
                let dst_offset = ((top as usize + y) * side + left as usize + x) * 4;
                self.pixels[dst_offset..dst_offset + 4]
                    .copy_from_slice(&img.pixels[src_offset..src_offset + 4]);
            }
        }
    }
}

/// Materialize the canvas for one layout plan. Rect regions are disjoint by
/// construction, so copy order does not affect the result.
pub fn compose(images: &[SourceImage], plan: &LayoutPlan) -> Canvas {
    let mut canvas = Canvas::new(plan.side);
    for (rect, &source) in plan.rects.iter().zip(plan.order.iter()) {
        canvas.blit(&images[source], rect.x, rect.y);
    }
    canvas
}

pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, SpritePackError> {
    let mut png = Vec::new();
    let encoder = PngEncoder::new(&mut png);
    encoder
        .write_image(
            &canvas.pixels,
            canvas.side,
            canvas.side,
            image::ColorType::Rgba8.into(),
        )
        .map_err(|err| SpritePackError::Encode(err.to_string()))?;
    Ok(png)
}
