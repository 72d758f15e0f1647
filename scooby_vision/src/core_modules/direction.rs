// THEORY:
// The `DirectionClassifier` turns two consecutive observations of the same blob
// into one of five coarse motion labels. It is a noise filter, not a physical
// model: only a large relative change between two frames counts as a deliberate
// gesture, everything smaller is `Stop`.
//
// Decision order (first match wins):
// 1.  Horizontal: `|dx| / previous.x` above the horizontal threshold gives Right
//     when the centroid moved toward smaller x, Left otherwise.
// 2.  Depth: `|d_area| / previous.area` above the area threshold gives Forward when
//     the blob shrank, Backward when it grew.
// 3.  Otherwise `Stop`.
//
// A zero denominator skips its rule. A ratio that is not finite means the inputs
// were garbage (NaN or infinite coordinates); the whole classification then falls
// back to `Stop`, which is always a safe answer.

use crate::config::TrackingConfig;
use crate::core_modules::contour::BlobObservation;
use crate::error::{TrackingError, TrackingResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse direction of motion between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionLabel {
    Left,
    Right,
    Forward,
    Backward,
    Stop,
}

impl DirectionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectionLabel::Left => "Left",
            DirectionLabel::Right => "Right",
            DirectionLabel::Forward => "Forward",
            DirectionLabel::Backward => "Backward",
            DirectionLabel::Stop => "Stop",
        }
    }
}

impl fmt::Display for DirectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure classifier over two observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionClassifier {
    pub horizontal_threshold: f64,
    pub area_threshold: f64,
}

impl Default for DirectionClassifier {
    fn default() -> Self {
        Self::new(&TrackingConfig::default())
    }
}

impl DirectionClassifier {
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            horizontal_threshold: config.horizontal_threshold,
            area_threshold: config.area_threshold,
        }
    }

    /// Classifies the motion from `previous` to `current`. Never fails.
    pub fn classify(
        &self,
        previous: &BlobObservation,
        current: &BlobObservation,
    ) -> DirectionLabel {
        match self.try_classify(previous, current) {
            Ok(label) => label,
            Err(e) => {
                tracing::debug!("Falling back to Stop: {}", e);
                DirectionLabel::Stop
            }
        }
    }

    fn try_classify(
        &self,
        previous: &BlobObservation,
        current: &BlobObservation,
    ) -> TrackingResult<DirectionLabel> {
        let dx = previous.centroid.x - current.centroid.x;
        let d_area = previous.area - current.area;
        tracing::trace!(dx, d_area, "Displacement");

        if relative_change(dx, previous.centroid.x)?
            .is_some_and(|ratio| ratio > self.horizontal_threshold)
        {
            return Ok(if dx > 0.0 {
                DirectionLabel::Right
            } else {
                DirectionLabel::Left
            });
        }
        if relative_change(d_area, previous.area)?
            .is_some_and(|ratio| ratio > self.area_threshold)
        {
            return Ok(if d_area > 0.0 {
                DirectionLabel::Forward
            } else {
                DirectionLabel::Backward
            });
        }
        Ok(DirectionLabel::Stop)
    }
}

/// `|delta| / base`, or `None` when `base` is zero.
fn relative_change(delta: f64, base: f64) -> TrackingResult<Option<f64>> {
    if base == 0.0 {
        return Ok(None);
    }
    let ratio = delta.abs() / base;
    if ratio.is_finite() {
        Ok(Some(ratio))
    } else {
        Err(TrackingError::DegenerateRatio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obs(x: f64, area: f64) -> BlobObservation {
        BlobObservation::new(x, 50.0, area)
    }

    fn classify(prev: BlobObservation, cur: BlobObservation) -> DirectionLabel {
        DirectionClassifier::default().classify(&prev, &cur)
    }

    #[test]
    fn horizontal_threshold_boundary() {
        assert_eq!(classify(obs(100.0, 400.0), obs(149.0, 400.0)), DirectionLabel::Stop);
        assert_eq!(classify(obs(100.0, 400.0), obs(151.0, 400.0)), DirectionLabel::Left);
        assert_eq!(classify(obs(100.0, 400.0), obs(49.0, 400.0)), DirectionLabel::Right);
    }

    #[test]
    fn exactly_half_is_not_enough() {
        assert_eq!(classify(obs(100.0, 400.0), obs(150.0, 400.0)), DirectionLabel::Stop);
        assert_eq!(classify(obs(100.0, 400.0), obs(100.0, 600.0)), DirectionLabel::Stop);
    }

    #[test]
    fn area_change_gives_depth() {
        assert_eq!(classify(obs(100.0, 400.0), obs(100.0, 100.0)), DirectionLabel::Forward);
        assert_eq!(classify(obs(100.0, 400.0), obs(100.0, 900.0)), DirectionLabel::Backward);
    }

    #[test]
    fn horizontal_takes_precedence() {
        assert_eq!(classify(obs(100.0, 400.0), obs(10.0, 10.0)), DirectionLabel::Right);
        assert_eq!(classify(obs(100.0, 400.0), obs(190.0, 2000.0)), DirectionLabel::Left);
    }

    #[test]
    fn zero_x_falls_through_to_area() {
        assert_eq!(classify(obs(0.0, 400.0), obs(300.0, 400.0)), DirectionLabel::Stop);
        assert_eq!(classify(obs(0.0, 400.0), obs(300.0, 100.0)), DirectionLabel::Forward);
    }

    #[test]
    fn zero_area_falls_through_to_stop() {
        assert_eq!(classify(obs(0.0, 0.0), obs(300.0, 900.0)), DirectionLabel::Stop);
    }

    #[test]
    fn non_finite_input_is_stop() {
        assert_eq!(classify(obs(100.0, 400.0), obs(f64::INFINITY, 400.0)), DirectionLabel::Stop);
        assert_eq!(classify(obs(100.0, 400.0), obs(f64::NAN, 400.0)), DirectionLabel::Stop);
    }

    #[test]
    fn identical_observations_are_stop() {
        assert_eq!(classify(obs(100.0, 400.0), obs(100.0, 400.0)), DirectionLabel::Stop);
    }

    #[test]
    fn custom_thresholds_apply() {
        let classifier = DirectionClassifier {
            horizontal_threshold: 0.1,
            area_threshold: 0.5,
        };
        assert_eq!(
            classifier.classify(&obs(100.0, 400.0), &obs(120.0, 400.0)),
            DirectionLabel::Left
        );
    }

    #[test]
    fn labels_render_as_words() {
        assert_eq!(DirectionLabel::Backward.to_string(), "Backward");
        assert_eq!(DirectionLabel::Right.as_str(), "Right");
    }

    proptest! {
        #[test]
        fn never_panics_and_small_moves_are_stop(
            x in 1.0f64..1000.0,
            area in 1.0f64..10000.0,
            fx in -0.5f64..=0.5,
            fa in -0.5f64..=0.5,
        ) {
            let current = obs(x * (1.0 + fx * 0.99), area * (1.0 + fa * 0.99));
            let label = classify(obs(x, area), current);
            prop_assert_eq!(label, DirectionLabel::Stop);
        }

        #[test]
        fn large_horizontal_moves_are_never_depth(
            x in 1.0f64..1000.0,
            area in 1.0f64..10000.0,
            new_area in 0.0f64..100000.0,
        ) {
            let label = classify(obs(x, area), obs(x * 1.6, new_area));
            prop_assert_eq!(label, DirectionLabel::Left);
        }
    }
}
