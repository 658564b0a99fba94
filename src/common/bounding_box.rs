use serde::Serialize;
use crate::common::geometry;
use crate::detection_runners::ort_detector::nms::Nms;

/// A classified detection in normalised `[0, 1]` image coordinates.
///
/// Both the corner form and the center form are stored. Values are fixed at
/// construction; every accessor is read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    cx: f32,
    cy: f32,
    w: f32,
    h: f32,
    confidence: f32,
    class_index: usize,
    class_name: String,
}

impl Nms for BoundingBox {
    fn iou(&self, other: &Self) -> f32 {
        geometry::iou(self, other)
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }
}

impl BoundingBox {
    /// Builds a box from its center form `(cx, cy, w, h)`.
    ///
    /// Returns `None` when the resulting corners are not strictly ordered
    /// (`x1 < x2` and `y1 < y2`), which also rejects NaN geometry.
    pub fn from_cxcy_wh(cx: f32, cy: f32, w: f32, h: f32,
                        confidence: f32, class_index: usize, class_name: &str) -> Option<Self> {
        let (x1, y1, x2, y2) = geometry::to_corner_form(cx, cy, w, h);
        if !(x1 < x2 && y1 < y2) {
            return None;
        }

        Some(Self {
            x1,
            y1,
            x2,
            y2,
            cx,
            cy,
            w,
            h,
            confidence,
            class_index,
            class_name: class_name.to_string(),
        })
    }

    pub fn x1(&self) -> f32 {
        self.x1
    }

    pub fn y1(&self) -> f32 {
        self.y1
    }

    pub fn x2(&self) -> f32 {
        self.x2
    }

    pub fn y2(&self) -> f32 {
        self.y2
    }

    pub fn cx(&self) -> f32 {
        self.cx
    }

    pub fn cy(&self) -> f32 {
        self.cy
    }

    /// Returns the stored width of the bounding box.
    pub fn width(&self) -> f32 {
        self.w
    }

    /// Returns the stored height of the bounding box.
    pub fn height(&self) -> f32 {
        self.h
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Computes the area of the bounding box from the stored width and height.
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Returns the bounding box coordinates as `(x1, y1, x2, y2)`.
    pub fn xy1_xy2(&self) -> (f32, f32, f32, f32) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Scales the normalised corners to a `width` x `height` canvas, e.g. for drawing an overlay.
    pub fn as_x1y1_x2y2_i32(&self, width: u32, height: u32) -> (i32, i32, i32, i32) {
        let (w, h) = (width as f32, height as f32);
        ((self.x1 * w).round() as i32,
         (self.y1 * h).round() as i32,
         (self.x2 * w).round() as i32,
         (self.y2 * h).round() as i32)
    }

    /// Checks if this bounding box completely contains another bounding box `other`.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.x1 <= other.x1
            && self.x2 >= other.x2
            && self.y1 <= other.y1
            && self.y2 >= other.y2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_corner_form_from_center() {
        let b = BoundingBox::from_cxcy_wh(0.5, 0.5, 0.2, 0.2, 0.9, 1, "stop").unwrap();
        let (x1, y1, x2, y2) = b.xy1_xy2();
        assert!((x1 - 0.4).abs() < 1e-6 && (y1 - 0.4).abs() < 1e-6);
        assert!((x2 - 0.6).abs() < 1e-6 && (y2 - 0.6).abs() < 1e-6);
        assert_eq!(b.class_index(), 1);
        assert_eq!(b.class_name(), "stop");
        assert!((b.area() - 0.04).abs() < 1e-6);
        assert_eq!((b.cx(), b.cy()), (0.5, 0.5));
        assert_eq!((b.width(), b.height()), (0.2, 0.2));
        assert_eq!(b.confidence(), 0.9);
    }

    #[test]
    fn rejects_empty_or_inverted_extent() {
        assert!(BoundingBox::from_cxcy_wh(0.5, 0.5, 0.0, 0.2, 0.9, 0, "a").is_none());
        assert!(BoundingBox::from_cxcy_wh(0.5, 0.5, 0.2, -0.1, 0.9, 0, "a").is_none());
        assert!(BoundingBox::from_cxcy_wh(f32::NAN, 0.5, 0.2, 0.2, 0.9, 0, "a").is_none());
    }

    #[test]
    fn scales_to_pixels() {
        let b = BoundingBox::from_cxcy_wh(0.5, 0.5, 0.5, 0.5, 0.9, 0, "a").unwrap();
        assert_eq!(b.as_x1y1_x2y2_i32(640, 480), (160, 120, 480, 360));
    }

    #[test]
    fn containment() {
        let outer = BoundingBox::from_cxcy_wh(0.5, 0.5, 0.6, 0.6, 0.9, 0, "a").unwrap();
        let inner = BoundingBox::from_cxcy_wh(0.5, 0.5, 0.2, 0.2, 0.8, 0, "a").unwrap();
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }
}
