use crate::types::{PlacementRect, SourceImage};

/// Output of one packing pass: the final (square) canvas side, the placement
/// rects in placement order, and for each rect the index of its source image
/// in the caller's slice.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub side: u32,
    pub rects: Vec<PlacementRect>,
    pub order: Vec<usize>,
}

/// Starting canvas width: a total-area estimate, clamped up so the widest
/// image fits on one shelf. The packer may still exceed this vertically; the
/// final side is resolved in `pack_shelves`.
pub fn estimate_width(images: &[SourceImage], padding: u32) -> u32 {
    let area: u64 = images
        .iter()
        .map(|img| u64::from(img.width + padding) * u64::from(img.height + padding))
        .sum();
    let estimate = (area as f64).sqrt().ceil() as u32;
    let max_width = images.iter().map(|img| img.width).max().unwrap_or(0) + padding;
    estimate.max(max_width)
}

// Cursor state threaded through the shelf fold, one fresh value per step.
struct PackState {
    x: u32,
    y: u32,
    committed: u32,
    row_heights: Vec<u32>,
    rects: Vec<PlacementRect>,
}

impl PackState {
    fn new(padding: u32, capacity: usize) -> Self {
        Self {
            x: padding,
            y: padding,
            committed: 0,
            row_heights: Vec::new(),
            rects: Vec::with_capacity(capacity),
        }
    }

    fn place(mut self, img: &SourceImage, init_width: u32, padding: u32) -> Self {
        // Close the shelf when the image no longer fits. An oversized image
        // on an empty shelf is placed anyway; the width clamp in
        // `estimate_width` guarantees it ends up alone on its row.
        if !self.row_heights.is_empty() && self.x + img.width + padding > init_width {
            self.y += self.row_heights.iter().copied().max().unwrap_or(0) + padding;
            self.x = padding;
            self.committed = self.y;
            self.row_heights.clear();
        }
        self.rects.push(PlacementRect {
            id: img.id.clone(),
            x: self.x,
            y: self.y,
            width: img.width,
            height: img.height,
        });
        self.x += img.width + padding;
        self.row_heights.push(img.height);
        self
    }

    fn finish(mut self, padding: u32) -> (Vec<PlacementRect>, u32) {
        self.committed += self.row_heights.iter().copied().max().unwrap_or(0) + padding;
        (self.rects, self.committed)
    }
}

/// Greedy shelf packing: images sorted by height descending (ties keep input
/// order, so repeat runs are bit-identical), placed left-to-right into rows,
/// a new row whenever the current one is full. Total over any non-empty
/// input; the layout may waste space but never fails.
pub fn pack_shelves(images: &[SourceImage], padding: u32) -> LayoutPlan {
    let mut order: Vec<usize> = (0..images.len()).collect();
    order.sort_by(|&a, &b| images[b].height.cmp(&images[a].height));

    let init_width = estimate_width(images, padding);
    let state = order.iter().fold(
        PackState::new(padding, images.len()),
        |state, &i| state.place(&images[i], init_width, padding),
    );
    let (rects, committed) = state.finish(padding);

    LayoutPlan {
        side: init_width.max(committed),
        rects,
        order,
    }
}
