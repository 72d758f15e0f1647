pub mod blob_detector;
pub mod calibrator;
pub mod chunk;
pub mod color;
pub mod contour;
pub mod direction;
pub mod frame;
pub mod notifier;
pub mod overlay;
pub mod pixel;
pub mod sample_region;
pub mod tracker;
pub mod vision;
