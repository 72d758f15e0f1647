// THEORY:
// Frames come from a capture loop; selections come from whatever handles user
// input, usually on a different task. The session actor puts both streams into one
// mpsc queue in front of a single task that owns the `TrackingSession`. Because the
// task handles one message at a time, a selection always lands between two frames:
// it is applied to the most recent frame and takes effect from the next frame on.
// No frame is ever processed with a half-applied calibration.
//
// Frame submission does not wait for processing. Every direction event the session
// emits is forwarded to the event receiver returned by `spawn_session`, in addition
// to any sink installed on the session. Selections do wait, on a oneshot reply, so
// the caller learns whether the point was accepted.

use crate::core_modules::color::HsvColor;
use crate::core_modules::frame::Frame;
use crate::core_modules::notifier::{ChannelSink, DirectionEvent, NotificationSink};
use crate::core_modules::sample_region::SelectionPoint;
use crate::core_modules::vision::VisionBackend;
use crate::error::{TrackingError, TrackingResult};
use crate::pipeline::TrackingSession;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Messages understood by the session task.
pub enum SessionCommand {
    Frame(Frame),
    Select {
        point: SelectionPoint,
        reply: oneshot::Sender<TrackingResult<HsvColor>>,
    },
    Shutdown,
}

/// Cloneable front end of a running session task.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Queues a frame, waiting only if the command queue is full.
    pub async fn submit_frame(&self, frame: Frame) -> TrackingResult<()> {
        self.tx
            .send(SessionCommand::Frame(frame))
            .await
            .map_err(|_| TrackingError::SessionClosed)
    }

    /// Calibrates on the most recently submitted frame.
    pub async fn select(&self, point: SelectionPoint) -> TrackingResult<HsvColor> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(SessionCommand::Select { point, reply })
            .await
            .map_err(|_| TrackingError::SessionClosed)?;
        response.await.map_err(|_| TrackingError::SessionClosed)?
    }

    pub async fn shutdown(&self) -> TrackingResult<()> {
        self.tx
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| TrackingError::SessionClosed)
    }
}

/// Moves `session` onto its own task. The task ends on `Shutdown` or when every handle is dropped.
///
/// Emitted events arrive on the returned receiver. Both channels hold `capacity`
/// messages; events that find the receiver full are dropped. The receiver closes
/// when the task ends.
pub fn spawn_session<V>(
    mut session: TrackingSession<V>,
    capacity: usize,
) -> (
    SessionHandle,
    mpsc::Receiver<DirectionEvent>,
    JoinHandle<TrackingSession<V>>,
)
where
    V: VisionBackend + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<SessionCommand>(capacity.max(1));
    let (events, event_rx) = ChannelSink::channel(capacity);

    let task = tokio::spawn(async move {
        let mut latest: Option<Frame> = None;
        while let Some(command) = rx.recv().await {
            match command {
                SessionCommand::Frame(frame) => {
                    if let Some(event) = session.on_frame(&frame) {
                        events.notify(&event);
                    }
                    latest = Some(frame);
                }
                SessionCommand::Select { point, reply } => {
                    let result = match &latest {
                        Some(frame) => session.calibrate(frame, point),
                        None => Err(TrackingError::NoFrame),
                    };
                    let _ = reply.send(result);
                }
                SessionCommand::Shutdown => break,
            }
        }
        tracing::debug!("Session task stopped");
        session
    });

    (SessionHandle { tx }, event_rx, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackingConfig;
    use image::{Rgba, RgbaImage};

    const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);

    fn frame_with_square(x: u32, size: u32) -> Frame {
        let mut frame = RgbaImage::from_pixel(160, 80, Rgba([60, 60, 60, 255]));
        for py in 30..30 + size {
            for px in x..x + size {
                frame.put_pixel(px, py, RED);
            }
        }
        frame
    }

    #[tokio::test]
    async fn select_before_any_frame_fails() {
        let (handle, _events, _task) =
            spawn_session(TrackingSession::new(&TrackingConfig::default()), 4);
        let err = handle.select(SelectionPoint::new(1, 1)).await.unwrap_err();
        assert!(matches!(err, TrackingError::NoFrame));
    }

    fn unpooled() -> TrackingConfig {
        TrackingConfig {
            downsample_factor: 1,
            ..TrackingConfig::default()
        }
    }

    async fn drive(handle: &SessionHandle) {
        handle.submit_frame(frame_with_square(120, 12)).await.unwrap();
        handle.select(SelectionPoint::new(126, 36)).await.unwrap();
        handle.submit_frame(frame_with_square(120, 12)).await.unwrap();
        handle.submit_frame(frame_with_square(20, 12)).await.unwrap();
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn frames_and_selection_are_serialized() {
        let (handle, mut events, task) = spawn_session(TrackingSession::new(&unpooled()), 8);
        drive(&handle).await;

        let session = task.await.unwrap();
        assert!(session.is_calibrated());
        let event = events.recv().await.unwrap();
        assert_eq!(event.to_string(), "Right");
        assert_eq!(event.frame_index, 2);
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn installed_sink_still_receives_events() {
        let (sink, mut sink_events) = ChannelSink::channel(8);
        let session = TrackingSession::new(&unpooled()).with_sink(sink);
        let (handle, mut events, task) = spawn_session(session, 8);
        drive(&handle).await;
        task.await.unwrap();

        assert_eq!(events.recv().await.map(|e| e.label.as_str()), Some("Right"));
        assert_eq!(sink_events.recv().await.map(|e| e.label.as_str()), Some("Right"));
    }

    #[tokio::test]
    async fn dropped_task_reports_closed() {
        let (handle, _events, task) =
            spawn_session(TrackingSession::new(&TrackingConfig::default()), 1);
        handle.shutdown().await.unwrap();
        task.await.unwrap();
        let err = handle.submit_frame(RgbaImage::new(2, 2)).await.unwrap_err();
        assert!(matches!(err, TrackingError::SessionClosed));
    }
}
