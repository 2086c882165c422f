//! ROI tightening heuristic — propose a narrower capture rectangle.

use sage_core::config::EngineConfig;
use sage_core::types::Bounds;

/// ROI tightener with a confidence floor and a dark-fill band.
pub struct RoiTightener {
    /// Minimum recognition confidence before tightening. Default: 0.70.
    pub min_confidence: f64,
    /// Dark bbox must fill at least this share of the region. Default: 0.10.
    pub min_fill: f64,
    /// Dark bbox must fill at most this share of the region. Default: 0.55.
    pub max_fill: f64,
    /// Padding around the bbox as a share of its size. Default: 0.10.
    pub padding: f64,
}

impl RoiTightener {
    pub fn new() -> Self {
        Self {
            min_confidence: 0.70,
            min_fill: 0.10,
            max_fill: 0.55,
            padding: 0.10,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let (min_fill, max_fill) = config.effective_roi_fill_band();
        Self {
            min_confidence: config.effective_roi_min_confidence(),
            min_fill,
            max_fill,
            padding: config.effective_roi_padding(),
        }
    }

    /// Propose a tighter rectangle around the dark-pixel bounding box.
    ///
    /// Returns `None` unless confidence clears the floor and the bbox fill
    /// sits inside the band — a near-full region means the crop is already
    /// tight, a near-empty one means recognition is unreliable.
    pub fn suggest(&self, region: &Bounds, dark_bbox: &Bounds, confidence: f64) -> Option<Bounds> {
        if confidence < self.min_confidence {
            return None;
        }
        let region_area = region.area();
        if region_area <= 0.0 {
            return None;
        }
        let fill = dark_bbox.area() / region_area;
        if fill < self.min_fill || fill > self.max_fill {
            return None;
        }

        let pad_x = dark_bbox.width * self.padding;
        let pad_y = dark_bbox.height * self.padding;
        let x = (dark_bbox.x - pad_x).max(region.x);
        let y = (dark_bbox.y - pad_y).max(region.y);
        let right = (dark_bbox.x + dark_bbox.width + pad_x).min(region.x + region.width);
        let bottom = (dark_bbox.y + dark_bbox.height + pad_y).min(region.y + region.height);
        Some(Bounds::new(x, y, right - x, bottom - y))
    }
}

impl Default for RoiTightener {
    fn default() -> Self {
        Self::new()
    }
}
