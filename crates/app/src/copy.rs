//! Frame copy from a capture into a writer.
//!
//! Decoding runs on a dedicated reader thread feeding the writer through a
//! small bounded queue, so a slow sink backpressures the source instead of
//! buffering unboundedly. Buffers come back on a recycle channel and are
//! reused for later reads.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

use anyhow::{Context, Result, anyhow};
use crossbeam_channel::{Receiver, Sender, bounded};
use cv_videoio::{
    CaptureBackend, CaptureProperty, VideoCapture, VideoWriter, WriterBackend, WriterParams,
};
#[cfg(feature = "with-opencv")]
use opencv::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{CopyConfig, DEFAULT_FPS};

/// Frames in flight between the reader thread and the writer.
const FRAME_QUEUE_DEPTH: usize = 2;

/// A frame buffer the copy loop moves between threads.
pub(crate) trait CopyFrame: Default + Send + 'static {
    /// A read that succeeded without producing an image ends the copy.
    fn is_blank(&self) -> bool;
}

#[cfg(feature = "with-opencv")]
impl CopyFrame for cv_videoio::Mat {
    fn is_blank(&self) -> bool {
        self.empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CopyStats {
    pub skipped: usize,
    pub read: usize,
    pub written: usize,
}

#[cfg(feature = "with-opencv")]
pub(crate) fn run(config: CopyConfig) -> Result<()> {
    use cv_videoio::{OpenCvVideoCapture, OpenCvWriter};

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_shutdown = shutdown.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_shutdown.store(true, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl+C handler: {err}");
    }

    let capture = OpenCvVideoCapture::new()?;
    let sink = OpenCvWriter::create()?;
    run_with(&config, capture, sink, shutdown)?;
    Ok(())
}

/// Opens `capture` on the configured source, skips leading frames, opens
/// `sink` on the target and copies until the source ends, the frame limit is
/// reached, or `shutdown` is set.
pub(crate) fn run_with<C, W>(
    config: &CopyConfig,
    mut capture: VideoCapture<C>,
    sink: W,
    shutdown: Arc<AtomicBool>,
) -> Result<CopyStats>
where
    C: CaptureBackend + Send + 'static,
    C::Frame: CopyFrame,
    W: WriterBackend<Frame = C::Frame>,
{
    let copy_span = tracing::info_span!(
        "vio.copy",
        source = %config.source,
        target = %config.target,
        codec = %config.codec
    );
    let _copy_span_guard = copy_span.enter();

    capture
        .open_with(&config.source, config.source_api)
        .with_context(|| format!("opening {}", config.source))?;

    let skipped = if config.skip > 0 {
        let skipped = capture.grab(config.skip);
        debug!(requested = config.skip, skipped, "skipped leading frames");
        skipped
    } else {
        0
    };

    let params = writer_params(config, &capture);
    let writer = VideoWriter::with_backend(sink, config.target.clone(), &params)
        .and_then(VideoWriter::ensure_opened)
        .with_context(|| format!("opening {}", config.target))?;
    info!(
        width = params.width,
        height = params.height,
        fps = params.fps,
        "writer ready"
    );

    let started = Instant::now();
    let (frames, recycle, reader) = spawn_reader(capture, config.frame_limit, shutdown)?;

    let mut written = 0usize;
    let mut outcome = Ok(());
    for frame in frames.iter() {
        if let Err(err) = writer.write(&frame) {
            outcome = Err(err).with_context(|| format!("writing frame {written}"));
            break;
        }
        written += 1;
        let _ = recycle.try_send(frame);
    }
    // Unblocks the reader if the loop ended early.
    drop(frames);

    let read = reader
        .join()
        .map_err(|_| anyhow!("capture thread panicked"))?;
    writer.close();
    outcome?;

    info!(
        read,
        written,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "copy finished"
    );
    Ok(CopyStats {
        skipped,
        read,
        written,
    })
}

/// Explicit flags win; otherwise the source's own properties are used.
fn writer_params<C: CaptureBackend>(
    config: &CopyConfig,
    capture: &VideoCapture<C>,
) -> WriterParams {
    let width = config
        .width
        .unwrap_or_else(|| capture.get(CaptureProperty::FRAME_WIDTH) as i32);
    let height = config
        .height
        .unwrap_or_else(|| capture.get(CaptureProperty::FRAME_HEIGHT) as i32);
    let fps = config.fps.unwrap_or_else(|| {
        let reported = capture.get(CaptureProperty::FPS);
        if reported.is_finite() && reported > 0.0 {
            reported
        } else {
            warn!("source reports no frame rate, using {DEFAULT_FPS}");
            DEFAULT_FPS
        }
    });
    WriterParams::new(config.codec.decode(), fps, width, height)
}

/// Spawns a thread reading frames from `capture` until the stream ends,
/// `limit` frames were read, or `shutdown` is set.
///
/// Returns the frame receiver, the sender used to hand buffers back for reuse,
/// and a handle yielding the number of frames read.
fn spawn_reader<C>(
    mut capture: VideoCapture<C>,
    limit: Option<usize>,
    shutdown: Arc<AtomicBool>,
) -> Result<(Receiver<C::Frame>, Sender<C::Frame>, JoinHandle<usize>)>
where
    C: CaptureBackend + Send + 'static,
    C::Frame: CopyFrame,
{
    let (frame_tx, frame_rx) = bounded(FRAME_QUEUE_DEPTH);
    let (recycle_tx, recycle_rx) = bounded::<C::Frame>(FRAME_QUEUE_DEPTH + 1);

    let handle = thread::Builder::new()
        .name("vio-capture".into())
        .spawn(move || {
            let mut read = 0usize;
            while limit.is_none_or(|max| read < max) && !shutdown.load(Ordering::SeqCst) {
                let mut frame = recycle_rx.try_recv().unwrap_or_default();
                if !capture.read(&mut frame) || frame.is_blank() {
                    break;
                }
                if frame_tx.send(frame).is_err() {
                    break;
                }
                read += 1;
            }
            capture.close();
            read
        })
        .context("spawning capture thread")?;

    Ok((frame_rx, recycle_tx, handle))
}
