// THEORY:
// The `BlobTracker` gives the system its one frame of memory. Every frame it asks
// the vision backend for the dominant blob of the target color and keeps the
// answer as its `TrackingState`. Nothing else is remembered: there is a single
// blob, no identity to maintain and no occlusion recovery. A frame with no blob
// simply leaves the state as it was.
//
// Ordering is the whole contract here. Detection (`update`) and commit (`advance`)
// are separate steps so that the caller can classify the motion against the old
// observation before it is overwritten. `advance` hands the old value back while
// storing the new one, so the swap happens in one place.

use crate::core_modules::color::HsvColor;
use crate::core_modules::contour::{BlobObservation, Contour};
use crate::core_modules::frame::Frame;
use crate::core_modules::vision::VisionBackend;
use crate::error::{TrackingError, TrackingResult};

/// What the tracker knows between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackingState {
    pub calibrated: bool,
    /// Most recent successful observation since the last calibration.
    pub observation: Option<BlobObservation>,
}

/// Everything the backend found in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Summary of the largest contour.
    pub observation: BlobObservation,
    /// All surviving contours, largest first. Kept for display.
    pub contours: Vec<Contour>,
}

#[derive(Debug, Default)]
pub struct BlobTracker {
    state: TrackingState,
}

impl BlobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn is_calibrated(&self) -> bool {
        self.state.calibrated
    }

    /// Forgets the last observation and marks the tracker calibrated.
    pub fn reset(&mut self) {
        self.state = TrackingState {
            calibrated: true,
            observation: None,
        };
    }

    /// Detects the blobs of `target` in `frame` without touching the state.
    pub fn update<V: VisionBackend + ?Sized>(
        &self,
        backend: &V,
        frame: &Frame,
        target: &HsvColor,
    ) -> TrackingResult<Detection> {
        let contours = backend.find_contours(frame, target);
        let observation = contours
            .first()
            .map(Contour::observation)
            .ok_or(TrackingError::NoBlobDetected)?;
        Ok(Detection {
            observation,
            contours,
        })
    }

    /// Stores `observation` and returns the one it replaces.
    pub fn advance(&mut self, observation: BlobObservation) -> Option<BlobObservation> {
        self.state.observation.replace(observation)
    }
}
