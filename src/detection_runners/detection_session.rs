use std::time::Instant;
use crate::common::{DetectError, DetectionOutcome, LabelTable, ModelConfig, SenseImage, SessionState, TensorShape};
use crate::data::TimeCalc;
use crate::detection_processing;
use crate::detection_runners::inference_process::InferenceProcess;
use crate::detection_runners::nms;
use crate::utils;

/// Owns one loaded model and its label table and turns images into detections.
///
/// `Uninitialized -> Ready` via [`setup`](Self::setup), `-> Closed` via
/// [`close`](Self::close). Calls must be serialized by the caller: at most one
/// `detect` in flight, and never `close` while a `detect` is running.
#[derive(Debug)]
pub struct DetectionSession<P: InferenceProcess> {
    config: ModelConfig,
    state: SessionState,
    model: Option<P>,
    labels: LabelTable,
    shape: Option<TensorShape>,
    timings: TimeCalc,
}

impl<P: InferenceProcess> DetectionSession<P> {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            state: SessionState::Uninitialized,
            model: None,
            labels: LabelTable::default(),
            shape: None,
            timings: TimeCalc::default(),
        }
    }

    /// Loads the model with the backend's own loader.
    pub fn setup(&mut self) -> Result<(), DetectError> {
        self.setup_with(P::new)
    }

    /// Loads the model through `loader`, derives the tensor shape and reads the labels.
    ///
    /// On failure the session stays `Uninitialized` and setup may be retried.
    pub fn setup_with<F>(&mut self, loader: F) -> Result<(), DetectError>
    where
        F: FnOnce(&ModelConfig) -> anyhow::Result<P>,
    {
        if self.state != SessionState::Uninitialized {
            return Err(DetectError::InvalidState {
                state: self.state,
                expected: SessionState::Uninitialized,
            });
        }

        let init_err = |err: anyhow::Error| {
            log::error!("Detector setup failed: {err:#}");
            DetectError::Initialization(format!("{err:#}"))
        };

        let model = loader(&self.config).map_err(init_err)?;
        let shape = TensorShape::from_model_dims(model.input_dims(), model.output_dims()).map_err(init_err)?;
        let labels = match &self.config.names {
            Some(names) => LabelTable::from_names(names.as_slice()),
            None => LabelTable::from_file(&self.config.labels_path).map_err(init_err)?,
        };
        if labels.is_empty() {
            return Err(init_err(anyhow::anyhow!("label table is empty")));
        }
        if labels.len() != shape.num_classes() {
            log::warn!(
                "Model scores {} classes but {} labels were loaded; unlabelled classes are ignored",
                shape.num_classes(), labels.len()
            );
        }

        log::info!(
            "Detector ready on {} | Input {}x{} ({:?}) | {} positions x {} classes | {} labels",
            model.device(), shape.width, shape.height, shape.layout,
            shape.num_elements, shape.num_classes(), labels.len()
        );
        log::debug!("{}", self.config.summary());

        self.model = Some(model);
        self.shape = Some(shape);
        self.labels = labels;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Runs preprocessing, inference, decoding and suppression on one image.
    ///
    /// Reports exactly one outcome; failures never carry partial results.
    pub fn detect(&mut self, image: &SenseImage) -> DetectionOutcome {
        match self.try_detect(image) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("Detection failed: {err}");
                err.into()
            }
        }
    }

    fn try_detect(&mut self, image: &SenseImage) -> Result<DetectionOutcome, DetectError> {
        let invalid_state = DetectError::InvalidState {
            state: self.state,
            expected: SessionState::Ready,
        };
        if self.state != SessionState::Ready {
            return Err(invalid_state);
        }
        let (Some(model), Some(shape)) = (self.model.as_mut(), self.shape) else {
            return Err(invalid_state);
        };
        let inference_err = |err: anyhow::Error| DetectError::Inference(format!("{err:#}"));
        let profile = self.config.profile;

        let detect_time = Instant::now();
        let mut _detect_elapsed = detect_time.elapsed();

        let xs = model.preprocess(image, &shape).map_err(inference_err)?;
        let t_pre = detect_time.elapsed() - _detect_elapsed;
        _detect_elapsed = utils::trace(profile, "TIME", "Preprocessing input", detect_time, _detect_elapsed);

        let ys = model.inference(xs).map_err(inference_err)?;
        let t_exe = detect_time.elapsed() - _detect_elapsed;
        _detect_elapsed = utils::trace(profile, "TIME", "Detection run", detect_time, _detect_elapsed);

        let raw = ys.into_flat_vec();
        if raw.len() != shape.output_len() {
            return Err(DetectError::Inference(format!(
                "model produced {} values, expected {} ({} channels x {} positions)",
                raw.len(), shape.output_len(), shape.num_channels, shape.num_elements
            )));
        }

        let candidates = detection_processing::decode(&raw, &shape, &self.labels, self.config.conf_threshold);
        let mut boxes = nms::suppress(&candidates, self.config.iou_threshold);
        if self.config.max_results > 0 {
            boxes.truncate(self.config.max_results);
        }
        let t_post = detect_time.elapsed() - _detect_elapsed;
        utils::trace(profile, "TIME", "Postprocessing", detect_time, _detect_elapsed);

        let elapsed = detect_time.elapsed();
        self.timings.add_or_push(0, t_pre);
        self.timings.add_or_push(1, t_exe);
        self.timings.add_or_push(2, t_post);

        log::trace!("{} candidates, {} kept after suppression", candidates.len(), boxes.len());

        if boxes.is_empty() {
            Ok(DetectionOutcome::Empty)
        } else {
            Ok(DetectionOutcome::Detections { boxes, elapsed })
        }
    }

    /// Releases the model. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.model.take().is_some() {
            log::info!("Detector closed");
        }
        self.shape = None;
        self.state = SessionState::Closed;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn tensor_shape(&self) -> Option<&TensorShape> {
        self.shape.as_ref()
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Preprocess / inference / postprocess latency over successful calls.
    pub fn timings(&self) -> &TimeCalc {
        &self.timings
    }
}
