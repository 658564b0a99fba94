pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
}

/// Greedy, class-agnostic non-max suppression over `candidates`.
///
/// Returns the kept boxes in confidence-descending order; equal confidences
/// keep their input order.
pub fn suppress<T: Nms + Clone>(candidates: &[T], iou_threshold: f32) -> Vec<T> {
    let mut boxes = candidates.to_vec();
    nms(&mut boxes, iou_threshold);
    boxes
}

/// In-place variant of [`suppress`]: sorts `boxes` by confidence and keeps a
/// box only if its IoU with every box kept before it is below `iou_threshold`.
pub fn nms<T: Nms>(boxes: &mut Vec<T>, iou_threshold: f32) {
    // stable sort, ties stay in decode order
    boxes.sort_by(|b1, b2| b2.confidence().total_cmp(&b1.confidence()));

    let mut current_index = 0;
    for index in 0..boxes.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            if boxes[prev_index].iou(&boxes[index]) >= iou_threshold {
                drop = true;
                break;
            }
        }
        if !drop {
            boxes.swap(current_index, index);
            current_index += 1;
        }
    }
    boxes.truncate(current_index);
}
