//! Video writer adapter.
//!
//! Unlike capture, writing is serialized internally: [`VideoWriter::write`]
//! takes `&self` and holds a lock for the duration of the native call, so an
//! `Arc<VideoWriter<_>>` can be fed from several threads without interleaving
//! frames.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, warn};

use crate::{
    backend::WriterBackend,
    error::{Result, VideoIoError},
    fourcc::FourCc,
    properties::CaptureApi,
};

/// Where a writer sends frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriterTarget {
    File(String),
    /// Pipeline descriptor handed verbatim to the selected backend.
    Pipeline { descriptor: String, api: CaptureApi },
}

impl fmt::Display for WriterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriterTarget::File(path) => f.write_str(path),
            WriterTarget::Pipeline { descriptor, .. } => f.write_str(descriptor),
        }
    }
}

/// Stream parameters fixed when a writer opens.
#[derive(Clone, Debug, PartialEq)]
pub struct WriterParams {
    /// Four-character codec name, e.g. `"MJPG"`.
    pub codec: String,
    pub fps: f64,
    pub width: i32,
    pub height: i32,
    pub is_color: bool,
}

impl WriterParams {
    pub fn new(codec: impl Into<String>, fps: f64, width: i32, height: i32) -> Self {
        Self {
            codec: codec.into(),
            fps,
            width,
            height,
            is_color: true,
        }
    }

    pub fn color(mut self, is_color: bool) -> Self {
        self.is_color = is_color;
        self
    }

    /// Check the numeric parameters, then the codec name.
    pub fn validate(&self) -> Result<FourCc> {
        if self.fps == 0.0 || self.width == 0 || self.height == 0 {
            return Err(VideoIoError::InvalidParameter {
                fps: self.fps,
                width: self.width,
                height: self.height,
            });
        }
        self.codec.parse()
    }
}

/// Owned video sink.
///
/// A sink the native library refuses to open is still returned from the
/// constructors; check [`VideoWriter::is_opened`] or use
/// [`VideoWriter::ensure_opened`].
pub struct VideoWriter<B: WriterBackend> {
    target: WriterTarget,
    handle: Mutex<Option<B>>,
}

impl<B: WriterBackend> VideoWriter<B> {
    pub fn open_file(path: &str, params: &WriterParams) -> Result<Self> {
        Self::open(WriterTarget::File(path.to_string()), params)
    }

    /// Open a pipeline sink, `api` selecting the backend that interprets
    /// `descriptor` (e.g. [`CaptureApi::GSTREAMER`]).
    pub fn open_pipeline(descriptor: &str, api: CaptureApi, params: &WriterParams) -> Result<Self> {
        Self::open(
            WriterTarget::Pipeline {
                descriptor: descriptor.to_string(),
                api,
            },
            params,
        )
    }

    /// Validate `params`, then allocate and open a native writer. Nothing is
    /// allocated when validation fails.
    pub fn open(target: WriterTarget, params: &WriterParams) -> Result<Self> {
        let fourcc = params.validate()?;
        Self::open_validated(B::create()?, target, fourcc, params)
    }

    /// Like [`VideoWriter::open`] on an already allocated handle.
    pub fn with_backend(backend: B, target: WriterTarget, params: &WriterParams) -> Result<Self> {
        let fourcc = params.validate()?;
        Self::open_validated(backend, target, fourcc, params)
    }

    fn open_validated(
        mut backend: B,
        target: WriterTarget,
        fourcc: FourCc,
        params: &WriterParams,
    ) -> Result<Self> {
        let _span = tracing::debug_span!("writer.open", %target, %fourcc, fps = params.fps).entered();
        let frame_size = (params.width, params.height);
        match backend.open(&target, fourcc, params.fps, frame_size, params.is_color) {
            Ok(true) => {}
            Ok(false) => warn!("video writer for {target} did not open"),
            Err(err) => warn!("video writer for {target} did not open: {err}"),
        }
        Ok(Self {
            target,
            handle: Mutex::new(Some(backend)),
        })
    }

    /// Turn a sink that failed to open into [`VideoIoError::OpenFailed`].
    pub fn ensure_opened(self) -> Result<Self> {
        if self.is_opened() {
            Ok(self)
        } else {
            Err(VideoIoError::OpenFailed {
                uri: self.target.to_string(),
            })
        }
    }

    pub fn target(&self) -> &WriterTarget {
        &self.target
    }

    /// Whether the sink is ready to accept frames.
    pub fn is_opened(&self) -> bool {
        self.lock().as_ref().is_some_and(|handle| {
            handle.is_opened().unwrap_or_else(|err| {
                debug!("writer is_opened failed: {err}");
                false
            })
        })
    }

    /// Submit one frame. Concurrent callers wait for each other; the frame is
    /// not retained past the call.
    pub fn write(&self, frame: &B::Frame) -> Result<()> {
        let mut guard = self.lock();
        let handle = guard.as_mut().ok_or(VideoIoError::Closed)?;
        handle.write(frame)
    }

    /// Release the native handle. Calling it again is a no-op.
    pub fn close(&self) {
        if let Some(handle) = self.lock().take() {
            release(handle);
        }
    }

    // The handle carries no Rust-side invariants a panicking writer could
    // break, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Option<B>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B: WriterBackend> Drop for VideoWriter<B> {
    fn drop(&mut self) {
        let handle = self
            .handle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            release(handle);
        }
    }
}

fn release<B: WriterBackend>(mut handle: B) {
    if let Err(err) = handle.release() {
        debug!("writer release failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_numbers_are_reported_together() {
        let err = WriterParams::new("MJPG", 0.0, 640, 0)
            .validate()
            .expect_err("zero fps and height");
        assert!(matches!(
            err,
            VideoIoError::InvalidParameter {
                width: 640,
                height: 0,
                ..
            }
        ));
        let message = err.to_string();
        assert!(message.starts_with("one of the numerical parameters is equal to zero"));
        assert!(message.contains("FPS: 0.000000, width: 640"));
        assert!(message.contains("height: 0"));
    }

    #[test]
    fn numbers_are_checked_before_the_codec() {
        let err = WriterParams::new("MJPEG", 0.0, 0, 0)
            .validate()
            .expect_err("all zero");
        assert!(matches!(err, VideoIoError::InvalidParameter { .. }));

        let err = WriterParams::new("MJPEG", 25.0, 640, 480)
            .validate()
            .expect_err("five char codec");
        assert!(matches!(err, VideoIoError::InvalidCodec(ref codec) if codec == "MJPEG"));
    }

    #[test]
    fn valid_params_yield_the_codec() {
        let params = WriterParams::new("MJPG", 25.0, 640, 480).color(false);
        assert!(!params.is_color);
        assert_eq!(params.validate().ok().map(|code| code.to_string()).as_deref(), Some("MJPG"));
    }

    #[test]
    fn negative_dimensions_are_left_to_the_native_library() {
        assert!(WriterParams::new("MJPG", -1.0, -640, 480).validate().is_ok());
    }

    #[test]
    fn targets_display_their_location() {
        assert_eq!(WriterTarget::File("out.avi".into()).to_string(), "out.avi");
        let pipeline = WriterTarget::Pipeline {
            descriptor: "appsrc ! fakesink".into(),
            api: CaptureApi::GSTREAMER,
        };
        assert_eq!(pipeline.to_string(), "appsrc ! fakesink");
    }
}
