// THEORY:
// The `pipeline` module is the top-level API of the tracker. A `TrackingSession`
// owns every piece of mutable state (target color, tracker state, last announced
// direction) and drives the per-frame flow:
//
//   selection ─▶ ColorCalibrator ─▶ target color
//   frame ─▶ BlobTracker ─▶ (previous, current) ─▶ DirectionClassifier ─▶ event?
//
// Notification policy: an event is emitted when the classified label differs from
// the last announced one and is not `Stop`. A `Stop` is never announced, but it
// re-arms the announcement, so motion resuming after a pause is reported even if
// it goes the same way as before the pause.
//
// All methods take `&mut self`, so a calibration can never interleave with the
// processing of a frame. Callers that receive selections on another task should
// go through `actor::spawn_session`, which serializes both streams.

use crate::config::TrackingConfig;
use crate::core_modules::blob_detector::ColorBlobDetector;
use crate::core_modules::calibrator::{Calibration, ColorCalibrator};
use crate::core_modules::color::HsvColor;
use crate::core_modules::contour::Contour;
use crate::core_modules::direction::{DirectionClassifier, DirectionLabel};
use crate::core_modules::frame::Frame;
use crate::core_modules::notifier::NotificationSink;
use crate::core_modules::overlay;
use crate::core_modules::sample_region::SelectionPoint;
use crate::core_modules::tracker::{BlobTracker, TrackingState};
use crate::core_modules::vision::VisionBackend;
use crate::error::{TrackingError, TrackingResult};

// Re-export key data structures for the public API.
pub use crate::core_modules::contour::{BlobObservation, Centroid};
pub use crate::core_modules::notifier::DirectionEvent;

/// Per-stream tracking state machine.
pub struct TrackingSession<V: VisionBackend = ColorBlobDetector> {
    backend: V,
    calibrator: ColorCalibrator,
    classifier: DirectionClassifier,
    tracker: BlobTracker,
    calibration: Option<Calibration>,
    /// Contours of the last processed frame, for display.
    contours: Vec<Contour>,
    last_emitted: Option<DirectionLabel>,
    sink: Option<Box<dyn NotificationSink>>,
    frame_index: u64,
}

impl TrackingSession<ColorBlobDetector> {
    /// Session backed by the built-in detector, tuned by `config`.
    pub fn new(config: &TrackingConfig) -> Self {
        Self::with_backend(ColorBlobDetector::new(config), config)
    }
}

impl<V: VisionBackend> TrackingSession<V> {
    pub fn with_backend(backend: V, config: &TrackingConfig) -> Self {
        Self {
            backend,
            calibrator: ColorCalibrator::new(config),
            classifier: DirectionClassifier::new(config),
            tracker: BlobTracker::new(),
            calibration: None,
            contours: Vec::new(),
            last_emitted: None,
            sink: None,
            frame_index: 0,
        }
    }

    /// Routes every emitted event to `sink` as well as returning it.
    pub fn with_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn set_sink(&mut self, sink: impl NotificationSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Samples the color around `point` and starts tracking it.
    ///
    /// On `OutOfBounds` nothing changes: an uncalibrated session stays
    /// uncalibrated and a calibrated one keeps its previous target and state.
    pub fn calibrate(&mut self, frame: &Frame, point: SelectionPoint) -> TrackingResult<HsvColor> {
        let calibration = match self.calibrator.calibrate(&self.backend, frame, point) {
            Ok(calibration) => calibration,
            Err(e) => {
                tracing::warn!(x = point.x, y = point.y, "Selection rejected: {}", e);
                return Err(e);
            }
        };

        let target = calibration.target;
        tracing::info!(
            hue = target.hue,
            saturation = target.saturation,
            value = target.value,
            rgba = ?calibration.display_color.0,
            "Calibrated target color"
        );
        self.calibration = Some(calibration);
        self.contours.clear();
        self.tracker.reset();
        Ok(target)
    }

    /// Processes one frame and returns the event it produced, if any.
    pub fn on_frame(&mut self, frame: &Frame) -> Option<DirectionEvent> {
        let frame_index = self.frame_index;
        self.frame_index += 1;

        let target = self.calibration.as_ref()?.target;
        let detection = match self.tracker.update(&self.backend, frame, &target) {
            Ok(detection) => detection,
            Err(TrackingError::NoBlobDetected) => {
                tracing::debug!(frame_index, "No blob detected, keeping previous state");
                self.contours.clear();
                return None;
            }
            Err(e) => {
                tracing::warn!(frame_index, "Tracking update failed: {}", e);
                self.contours.clear();
                return None;
            }
        };
        let current = detection.observation;
        self.contours = detection.contours;

        let previous = self.tracker.advance(current)?;
        let label = self.classifier.classify(&previous, &current);
        tracing::debug!(frame_index, %label, "Classified motion");
        self.record(label, frame_index)
    }

    /// Applies the notification policy to a classified label.
    fn record(&mut self, label: DirectionLabel, frame_index: u64) -> Option<DirectionEvent> {
        if label == DirectionLabel::Stop {
            self.last_emitted = None;
            return None;
        }
        if self.last_emitted == Some(label) {
            return None;
        }

        self.last_emitted = Some(label);
        let event = DirectionEvent { label, frame_index };
        tracing::info!(frame_index, direction = %label, "Direction changed");
        if let Some(sink) = &self.sink {
            sink.notify(&event);
        }
        Some(event)
    }

    /// Paints the calibration label, swatch, contour outlines and centroid marker
    /// onto `frame`. Uncalibrated sessions leave the frame untouched.
    pub fn annotate(&self, frame: &mut Frame) {
        if let Some(calibration) = &self.calibration {
            overlay::annotate(
                frame,
                calibration,
                &self.contours,
                self.tracker.state().observation.as_ref(),
            );
        }
    }

    /// Contours found in the last processed frame, largest first.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn is_calibrated(&self) -> bool {
        self.tracker.is_calibrated()
    }

    pub fn target(&self) -> Option<HsvColor> {
        self.calibration.as_ref().map(|c| c.target)
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn tracking_state(&self) -> &TrackingState {
        self.tracker.state()
    }

    pub fn last_emitted(&self) -> Option<DirectionLabel> {
        self.last_emitted
    }

    pub fn backend(&self) -> &V {
        &self.backend
    }
}
