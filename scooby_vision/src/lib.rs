// THEORY:
// This file is the main entry point for the `scooby_vision` library crate.
// The primary goal is to export the `TrackingSession` and its associated data
// structures (`TrackingConfig`, `DirectionEvent`, `DirectionLabel`, ...) as the
// high-level interface for following a colored object through a video stream.
// The building blocks in `core_modules` stay public so that a different vision
// backend or notification sink can be plugged in.

pub mod actor;
pub mod config;
pub mod core_modules;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use actor::{SessionCommand, SessionHandle, spawn_session};
pub use config::{LoggingConfig, TrackingConfig};
pub use core_modules::blob_detector::ColorBlobDetector;
pub use core_modules::calibrator::Calibration;
pub use core_modules::color::HsvColor;
pub use core_modules::contour::{BlobObservation, Centroid, Contour, Point};
pub use core_modules::direction::{DirectionClassifier, DirectionLabel};
pub use core_modules::frame::{Frame, frame_from_rgba};
pub use core_modules::notifier::{ChannelSink, DirectionEvent, NotificationSink};
pub use core_modules::sample_region::{SampleRegion, SelectionPoint};
pub use core_modules::tracker::{Detection, TrackingState};
pub use core_modules::vision::VisionBackend;
pub use error::{TrackingError, TrackingResult};
pub use pipeline::TrackingSession;
