use crate::common::{BoundingBox, LabelTable, TensorShape, GEOMETRY_CHANNELS};

/// Decodes a channel-major `[num_channels][num_elements]` output tensor into
/// candidate boxes.
///
/// The value for channel `j` at position `c` sits at `c + num_elements * j`.
/// Channels `0..4` hold `cx, cy, w, h`; the remaining channels hold one score
/// per class. A position yields a candidate when its best score is above
/// `threshold`, its corners lie within `[0, 1]` and its class has a label.
/// Anything else is dropped without error.
pub fn decode(raw: &[f32], shape: &TensorShape, labels: &LabelTable, threshold: f32) -> Vec<BoundingBox> {
    let mut boxes = Vec::new();
    let num_elements = shape.num_elements;

    if raw.len() < shape.output_len() {
        log::warn!("Output tensor holds {} values, expected {}", raw.len(), shape.output_len());
        return boxes;
    }

    for c in 0..num_elements {
        let mut max_conf = threshold;
        let mut max_idx: Option<usize> = None;
        for j in GEOMETRY_CHANNELS..shape.num_channels {
            let score = raw[c + num_elements * j];
            if score > max_conf {
                max_conf = score;
                max_idx = Some(j - GEOMETRY_CHANNELS);
            }
        }

        let Some(class_index) = max_idx else {
            continue;
        };
        let Some(class_name) = labels.get(class_index) else {
            continue;
        };

        let cx = raw[c];
        let cy = raw[c + num_elements];
        let w = raw[c + num_elements * 2];
        let h = raw[c + num_elements * 3];

        let bbox = match BoundingBox::from_cxcy_wh(cx, cy, w, h, max_conf, class_index, class_name) {
            Some(bbox) => bbox,
            None => continue,
        };

        let (x1, y1, x2, y2) = bbox.xy1_xy2();
        if [x1, y1, x2, y2].iter().all(|v| (0.0..=1.0).contains(v)) {
            boxes.push(bbox);
        }
    }

    boxes
}
