// Demo runner: drives a tracking session with a synthetic clip of a red square
// that jumps sideways, then approaches and recedes from the camera.
//
// Usage: scooby_vision [config.json]

use image::{Rgba, RgbaImage};
use scooby_vision::logging::init_logging;
use scooby_vision::{SelectionPoint, TrackingConfig, TrackingSession, spawn_session};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;
const BACKGROUND: Rgba<u8> = Rgba([70, 80, 75, 255]);
const TARGET: Rgba<u8> = Rgba([210, 30, 25, 255]);

/// (center x, side length) of the square in each frame.
const SCRIPT: &[(u32, u32)] = &[
    (240, 40),
    (240, 40),
    (100, 40),
    (100, 40),
    (40, 40),
    (40, 40),
    (40, 40),
    (40, 16),
    (40, 16),
    (40, 40),
    (200, 40),
];

fn render(center_x: u32, side: u32) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let left = center_x.saturating_sub(side / 2);
    let top = (HEIGHT / 2).saturating_sub(side / 2);
    for y in top..(top + side).min(HEIGHT) {
        for x in left..(left + side).min(WIDTH) {
            frame.put_pixel(x, y, TARGET);
        }
    }
    frame
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => TrackingConfig::load_or_default(path),
        None => TrackingConfig::default(),
    };
    config.validate()?;
    init_logging(&config.logging);
    tracing::info!("Scooby Vision - synthetic demo");

    let session = TrackingSession::new(&config);
    let (handle, mut events, task) = spawn_session(session, config.notification_capacity);

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("frame {:>3}: {}", event.frame_index, event);
        }
    });

    let (first_x, _) = SCRIPT[0];
    handle.submit_frame(render(first_x, 40)).await?;
    handle
        .select(SelectionPoint::new(first_x as i64, (HEIGHT / 2) as i64))
        .await?;

    for &(x, side) in SCRIPT {
        handle.submit_frame(render(x, side)).await?;
    }
    handle.shutdown().await?;

    // The event channel closes once the session task has returned.
    task.await?;
    printer.await?;
    Ok(())
}
