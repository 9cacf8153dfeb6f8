use crate::error::SpritePackError;
use crate::types::{PixelRatio, PlacementRect};
use serde_json::{Map, Value, json};

/// Assemble the side-car mapping for one build: image id → placement plus the
/// build's density tag. Field names and the 1|2 discriminant are part of the
/// on-disk contract consumed by downstream atlas readers.
pub fn atlas_metadata(
    rects: &[PlacementRect],
    ratio: PixelRatio,
) -> Result<Value, SpritePackError> {
    let mut map = Map::new();
    for rect in rects {
        let entry = json!({
            "width": rect.width,
            "height": rect.height,
            "x": rect.x,
            "y": rect.y,
            "pixelRatio": ratio.as_u8(),
        });
        // An id collision would silently overwrite a sibling's rect and
        // corrupt the mapping; discovery rejects duplicates upstream, this is
        // the backstop.
        if map.insert(rect.id.clone(), entry).is_some() {
            return Err(SpritePackError::DuplicateImageId(rect.id.clone()));
        }
    }
    Ok(Value::Object(map))
}
