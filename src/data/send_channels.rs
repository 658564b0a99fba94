use crossbeam_channel::{Receiver, Sender, TrySendError};
use crate::common::{DetectionOutcome, SenseImage};

/// Detector side of the channels: images in, outcomes out.
#[derive(Debug)]
pub struct DetectionState {
    pub opt_rx: Receiver<SenseImage>,
    pub det_tx: Sender<DetectionOutcome>,
}

/// Caller side of the channels.
#[derive(Debug, Clone)]
pub struct SendState {
    pub opt_tx: Sender<SenseImage>,
    pub det_rx: Receiver<DetectionOutcome>,
}

/// Builds a channel pair with room for `capacity` pending images.
///
/// Outcomes are unbounded so the detector never blocks on a slow reader.
pub fn detection_channels(capacity: usize) -> (SendState, DetectionState) {
    let (opt_tx, opt_rx) = crossbeam_channel::bounded(capacity.max(1));
    let (det_tx, det_rx) = crossbeam_channel::unbounded();
    (SendState { opt_tx, det_rx }, DetectionState { opt_rx, det_tx })
}

impl SendState {
    /// Queues `image` unless the detector is still busy; returns `false` when
    /// the frame was dropped or the detector has gone away.
    pub fn try_submit(&self, image: SenseImage) -> bool {
        match self.opt_tx.try_send(image) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::trace!("Detector busy, dropping frame");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("Detector is no longer running, dropping frame");
                false
            }
        }
    }

    /// Queues `image`, waiting for room if needed.
    pub fn submit(&self, image: SenseImage) -> anyhow::Result<()> {
        self.opt_tx
            .send(image)
            .map_err(|_| anyhow::anyhow!("Detector is no longer running"))
    }
}
