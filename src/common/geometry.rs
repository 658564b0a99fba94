use crate::common::BoundingBox;

/// Converts a center-form box `(cx, cy, w, h)` to corner form `(x1, y1, x2, y2)`.
#[inline]
pub fn to_corner_form(cx: f32, cy: f32, w: f32, h: f32) -> (f32, f32, f32, f32) {
    let x1 = cx - (w / 2.0);
    let y1 = cy - (h / 2.0);
    let x2 = cx + (w / 2.0);
    let y2 = cy + (h / 2.0);
    (x1, y1, x2, y2)
}

/// Computes the overlap area of two boxes from their corner coordinates.
#[inline]
pub fn intersection(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let left = a.x1().max(b.x1());
    let top = a.y1().max(b.y1());
    let right = a.x2().min(b.x2());
    let bottom = a.y2().min(b.y2());
    (right - left).max(0.) * (bottom - top).max(0.)
}

/// Computes the intersection over union (IoU) between two boxes.
///
/// The intersection comes from the corner coordinates while each box's area
/// comes from its stored `w * h`. A non-positive union yields `0.0`.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let inter = intersection(a, b);
    let union = a.area() + b.area() - inter;
    if union <= 0. {
        return 0.;
    }
    inter / union
}
