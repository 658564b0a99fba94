extern crate sense_detect;

use std::path::Path;
use image::{Rgb, RgbImage};
use sense_detect::common::{DetectError, DetectionOutcome, ModelConfig, SenseImage, SessionState};
use sense_detect::detection_runners::DetectionSession;
use sense_detect::detectors::spawn_detector;

use mock_model::MockModel;

fn config() -> ModelConfig {
    ModelConfig::new()
        .with_names(&["stop", "yield"])
        .with_conf_threshold(0.5)
        .with_iou_threshold(0.5)
}

fn frame() -> SenseImage {
    SenseImage::from(RgbImage::from_pixel(32, 24, Rgb([120, 64, 200])))
}

fn ready_session(config: ModelConfig, model: MockModel) -> DetectionSession<MockModel> {
    let mut session = DetectionSession::new(config);
    session.setup_with(|_| Ok(model)).unwrap();
    session
}

#[test]
fn detection() {
    let model = MockModel::with_rows(&[
        &[0.5, 0.5, 0.2, 0.2, 0.1, 0.9],
        &[0.3, 0.3, 0.1, 0.1, 0.2, 0.4],
    ]);
    let mut session = ready_session(config(), model);
    assert_eq!(session.state(), SessionState::Ready);

    let shape = session.tensor_shape().unwrap();
    assert_eq!((shape.width, shape.height), (8, 8));
    assert_eq!((shape.num_channels, shape.num_elements), (6, 2));

    match session.detect(&frame()) {
        DetectionOutcome::Detections { boxes, .. } => {
            assert_eq!(boxes.len(), 1);
            let b = &boxes[0];
            assert_eq!(b.class_index(), 1);
            assert_eq!(b.class_name(), "yield");
            assert_eq!(b.confidence(), 0.9);
            let (x1, y1, x2, y2) = b.xy1_xy2();
            assert!((x1 - 0.4).abs() < 1e-6 && (y1 - 0.4).abs() < 1e-6);
            assert!((x2 - 0.6).abs() < 1e-6 && (y2 - 0.6).abs() < 1e-6);
        }
        other => panic!("expected detections, got {:?}", other),
    }

    assert_eq!(session.timings().n(), 1);
}

#[test]
fn overlapping_boxes_of_different_classes_suppress_each_other() {
    let model = MockModel::with_rows(&[
        &[0.5, 0.5, 0.2, 0.2, 0.7, 0.0],
        &[0.5, 0.5, 0.2, 0.2, 0.0, 0.9],
        &[0.1, 0.1, 0.1, 0.1, 0.8, 0.0],
    ]);
    let mut session = ready_session(config(), model);

    let outcome = session.detect(&frame());
    let confidences: Vec<f32> = outcome.boxes().iter().map(|b| b.confidence()).collect();
    assert_eq!(confidences, vec![0.9, 0.8]);
    assert_eq!(outcome.boxes()[0].class_name(), "yield");
}

#[test]
fn results_are_truncated_to_max_results() {
    let model = MockModel::with_rows(&[
        &[0.1, 0.1, 0.1, 0.1, 0.6, 0.0],
        &[0.5, 0.5, 0.1, 0.1, 0.9, 0.0],
        &[0.9, 0.9, 0.1, 0.1, 0.0, 0.7],
    ]);
    let mut session = ready_session(config().with_max_results(2), model.clone());
    let confidences: Vec<f32> = session.detect(&frame()).boxes().iter().map(|b| b.confidence()).collect();
    assert_eq!(confidences, vec![0.9, 0.7]);

    let mut session = ready_session(config().with_max_results(0), model);
    assert_eq!(session.detect(&frame()).boxes().len(), 3);
}

#[test]
fn labels_are_read_from_file() {
    let labels_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/labels.txt");
    let config = ModelConfig::new().with_labels(labels_path.to_str().unwrap());
    let model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.1, 0.1, 0.8]]);
    let mut session = ready_session(config, model);

    assert_eq!(session.labels().names(), &["stop", "yield", "speed limit"]);
    assert_eq!(session.detect(&frame()).boxes()[0].class_name(), "speed limit");
}

#[test]
fn nchw_models_get_channels_first_input() {
    let mut model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.9, 0.0]]);
    model.input = vec![1, 3, 16, 8];
    let mut session = ready_session(config(), model);

    let shape = session.tensor_shape().unwrap();
    assert_eq!((shape.width, shape.height), (8, 16));
    assert_eq!(session.detect(&frame()).boxes().len(), 1);
}

#[test]
fn inference_failure_reports_error_and_session_recovers() {
    let mut model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.9, 0.0]]);
    model.fail_next = true;
    let mut session = ready_session(config(), model);

    let outcome = session.detect(&frame());
    assert!(outcome.error_message().unwrap().contains("delegate crashed"));
    assert!(outcome.boxes().is_empty());
    assert_eq!(session.state(), SessionState::Ready);

    assert_eq!(session.detect(&frame()).boxes().len(), 1);
    assert_eq!(session.timings().n(), 1);
}

#[test]
fn wrong_output_size_is_an_error() {
    let mut model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.9, 0.0]]);
    model.output = vec![1, 6, 2];
    model.tensor = vec![0.0; 6];
    let mut session = ready_session(config(), model);

    let outcome = session.detect(&frame());
    assert!(outcome.is_error());
    assert!(outcome.error_message().unwrap().contains("expected 12"));
}

#[test]
fn setup_failure_leaves_session_uninitialized() {
    let mut session: DetectionSession<MockModel> = DetectionSession::new(config().with_model("missing.onnx"));

    let err = session.setup().unwrap_err();
    assert!(matches!(err, DetectError::Initialization(ref msg) if msg.contains("missing.onnx")));
    assert_eq!(session.state(), SessionState::Uninitialized);
    assert!(session.tensor_shape().is_none());

    let model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.9, 0.0]]);
    session.setup_with(|_| Ok(model)).unwrap();
    assert_eq!(session.state(), SessionState::Ready);
}

#[test]
fn degenerate_shapes_fail_setup() {
    let mut model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2]]);
    model.output = vec![1, 4, 1];
    let mut session = DetectionSession::new(config());
    assert!(matches!(session.setup_with(|_| Ok(model)), Err(DetectError::Initialization(_))));
    assert_eq!(session.state(), SessionState::Uninitialized);

    let mut model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.9, 0.0]]);
    model.input = vec![1, 0, 8, 3];
    assert!(session.setup_with(|_| Ok(model)).is_err());
    assert_eq!(session.state(), SessionState::Uninitialized);
}

#[test]
fn grayscale_model_fails_setup() {
    let mut model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.9, 0.0]]);
    model.input = vec![1, 8, 8, 1];
    let mut session = DetectionSession::new(config());

    let err = session.setup_with(|_| Ok(model)).unwrap_err();
    assert!(err.to_string().contains("3-channel"));
    assert_eq!(session.state(), SessionState::Uninitialized);
    assert!(session.tensor_shape().is_none());
}

#[test]
fn missing_label_file_fails_setup() {
    let config = ModelConfig::new().with_labels("/no/such/labels.txt");
    let mut session = DetectionSession::new(config);
    let model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.9, 0.0]]);

    let err = session.setup_with(|_| Ok(model)).unwrap_err();
    assert!(err.to_string().contains("Labels could not be loaded"));
    assert_eq!(session.state(), SessionState::Uninitialized);
}

#[test]
fn close_is_idempotent_and_terminal() {
    let model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.9, 0.0]]);
    let mut session = ready_session(config(), model.clone());

    session.close();
    session.close();
    assert_eq!(session.state(), SessionState::Closed);

    let outcome = session.detect(&frame());
    assert!(outcome.error_message().unwrap().contains("closed"));

    let err = session.setup_with(|_| Ok(model)).unwrap_err();
    assert!(matches!(err, DetectError::InvalidState { state: SessionState::Closed, .. }));
}

#[test]
fn second_setup_is_rejected() {
    let model = MockModel::with_rows(&[&[0.5, 0.5, 0.2, 0.2, 0.9, 0.0]]);
    let mut session = ready_session(config(), model.clone());
    assert!(matches!(
        session.setup_with(|_| Ok(model)),
        Err(DetectError::InvalidState { state: SessionState::Ready, expected: SessionState::Uninitialized })
    ));
    assert_eq!(session.state(), SessionState::Ready);
}

#[test]
fn detector_thread_answers_every_frame() {
    let model = MockModel::with_rows(&[
        &[0.5, 0.5, 0.2, 0.2, 0.1, 0.9],
        &[0.3, 0.3, 0.1, 0.1, 0.2, 0.4],
    ]);
    let session = ready_session(config(), model);
    let (send_state, handle) = spawn_detector(session, 4).unwrap();

    for _ in 0..3 {
        send_state.submit(frame()).unwrap();
    }
    for _ in 0..3 {
        let outcome = send_state.det_rx.recv().unwrap();
        assert_eq!(outcome.boxes().len(), 1);
    }

    drop(send_state);
    handle.join().unwrap();
}
