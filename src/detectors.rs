use std::thread::JoinHandle;
use crate::common::SessionState;
use crate::data::{detection_channels, DetectionState, SendState};
use crate::detection_runners::detection_session::DetectionSession;
use crate::detection_runners::inference_process::InferenceProcess;

/// Serves detection requests until the image sender disconnects.
///
/// Each received image produces exactly one outcome on `det_tx`. The session is
/// closed when the loop ends.
pub fn detector_loop<P: InferenceProcess>(mut session: DetectionSession<P>, detection_state: DetectionState) {
    if session.state() != SessionState::Ready {
        log::warn!("Detector loop started with a {} session", session.state());
    }

    // MESSAGE LOOP STARTS HERE
    while let Ok(image) = detection_state.opt_rx.recv() {
        let outcome = session.detect(&image);
        if let Err(err) = detection_state.det_tx.send(outcome) {
            log::error!("sense_detect: Failed to send detection outcome: {}", err);
            break;
        }
    }

    session.close();
    log::info!("Detector loop finished");
}

/// Moves `session` onto a dedicated thread and returns the caller side of its channels.
pub fn spawn_detector<P>(session: DetectionSession<P>, capacity: usize) -> anyhow::Result<(SendState, JoinHandle<()>)>
where
    P: InferenceProcess + Send + 'static,
{
    let (send_state, detection_state) = detection_channels(capacity);
    let handle = std::thread::Builder::new()
        .name("sense-detector".to_string())
        .spawn(move || detector_loop(session, detection_state))?;
    Ok((send_state, handle))
}
