use anyhow::{Context, bail};
use clap::Parser;
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoWriter},
};
use scooby_vision::logging::init_logging;
use scooby_vision::{SelectionPoint, TrackingConfig, TrackingSession, frame_from_rgba};
use std::path::PathBuf;

/// Tracks a colored object through a video and writes an annotated copy.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Video to read.
    input: PathBuf,
    /// Annotated video to write (mp4v).
    output: PathBuf,
    /// Frame on which the selection is applied.
    #[arg(long, default_value_t = 0)]
    calibrate_frame: u64,
    /// Selection x coordinate; defaults to the frame center.
    #[arg(long)]
    select_x: Option<i64>,
    /// Selection y coordinate; defaults to the frame center.
    #[arg(long)]
    select_y: Option<i64>,
    /// JSON tracking configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => TrackingConfig::load_or_default(path),
        None => TrackingConfig::default(),
    };
    config.validate()?;
    init_logging(&config.logging);

    // --- Video I/O ---
    let input = args.input.to_string_lossy();
    let mut cap = VideoCapture::from_file(&input, videoio::CAP_ANY)?;
    if !cap.is_opened()? {
        bail!("could not open {}", input);
    }

    let frame_width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
    let frame_height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
    let fps = cap.get(videoio::CAP_PROP_FPS)?;

    let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
    let mut writer = VideoWriter::new(
        &args.output.to_string_lossy(),
        fourcc,
        fps,
        core::Size::new(frame_width as i32, frame_height as i32),
        true,
    )?;

    let point = SelectionPoint::new(
        args.select_x.unwrap_or(frame_width as i64 / 2),
        args.select_y.unwrap_or(frame_height as i64 / 2),
    );
    let mut session = TrackingSession::new(&config);
    let mut emitted = 0usize;

    // --- Processing loop ---
    let mut bgr = Mat::default();
    let mut index = 0u64;
    while cap.read(&mut bgr)? {
        if bgr.empty() {
            break;
        }

        let mut rgba = Mat::default();
        imgproc::cvt_color(&bgr, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;
        let mut frame = frame_from_rgba(frame_width, frame_height, rgba.data_bytes()?.to_vec())
            .with_context(|| format!("frame {} has an unexpected size", index))?;

        if index == args.calibrate_frame {
            if let Err(e) = session.calibrate(&frame, point) {
                tracing::warn!("Calibration on frame {} failed: {}", index, e);
            }
        }

        if let Some(event) = session.on_frame(&frame) {
            emitted += 1;
            tracing::info!(frame = event.frame_index, "{}", event);
        }

        // --- Visualization ---
        session.annotate(&mut frame);
        rgba.data_bytes_mut()?.copy_from_slice(frame.as_raw());
        let mut output_frame = Mat::default();
        imgproc::cvt_color(&rgba, &mut output_frame, imgproc::COLOR_RGBA2BGR, 0)?;
        writer.write(&output_frame)?;

        index += 1;
    }

    tracing::info!(
        frames = index,
        events = emitted,
        "Processing complete. Output saved to {}",
        args.output.display()
    );
    Ok(())
}
