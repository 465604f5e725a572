//! Video capture adapter.
//!
//! [`VideoCapture`] owns one native source handle and forwards every call to
//! it. It is not internally synchronized: all mutating calls take `&mut self`,
//! so sharing a capture across threads needs the caller's own lock.

use tracing::debug;

use crate::{
    backend::CaptureBackend,
    error::{Result, VideoIoError},
    fourcc::FourCc,
    properties::{CaptureApi, CaptureProperty},
    source::CaptureSource,
};

/// Owned video source.
///
/// The handle is released on [`VideoCapture::close`] or drop, whichever comes
/// first. Once closed the capture behaves like one that never opened.
///
/// [`VideoCapture::new`] followed by one of the `open_*` methods keeps the
/// capture when opening fails, so the caller still holds a closeable handle.
/// The `from_*` and [`VideoCapture::open_source`] constructors release it and
/// return only the error.
pub struct VideoCapture<B: CaptureBackend> {
    handle: Option<B>,
}

impl<B: CaptureBackend> VideoCapture<B> {
    /// Allocate an unopened capture.
    pub fn new() -> Result<Self> {
        Ok(Self::with_backend(B::create()?))
    }

    /// Wrap an already allocated handle.
    pub fn with_backend(backend: B) -> Self {
        Self {
            handle: Some(backend),
        }
    }

    /// Open a file path, stream URL, or pipeline descriptor.
    ///
    /// On failure the handle is released before the error is returned. Use
    /// [`VideoCapture::new`] and [`VideoCapture::open_file`] to keep an
    /// unopened capture around instead.
    pub fn from_file(uri: &str) -> Result<Self> {
        let mut capture = Self::new()?;
        capture.open_file(uri)?;
        Ok(capture)
    }

    pub fn from_device(index: i32) -> Result<Self> {
        let mut capture = Self::new()?;
        capture.open_device(index)?;
        Ok(capture)
    }

    /// Open whatever `source` names: a device for integers and numeric
    /// strings, a file/URI otherwise.
    pub fn open_source(source: impl Into<CaptureSource>) -> Result<Self> {
        let mut capture = Self::new()?;
        capture.open(&source.into())?;
        Ok(capture)
    }

    pub fn open(&mut self, source: &CaptureSource) -> Result<()> {
        self.open_with(source, CaptureApi::ANY)
    }

    pub fn open_with(&mut self, source: &CaptureSource, api: CaptureApi) -> Result<()> {
        match source {
            CaptureSource::Device(index) => self.open_device_with(*index, api),
            CaptureSource::Uri(uri) => self.open_file_with(uri, api),
        }
    }

    pub fn open_file(&mut self, uri: &str) -> Result<()> {
        self.open_file_with(uri, CaptureApi::ANY)
    }

    pub fn open_file_with(&mut self, uri: &str, api: CaptureApi) -> Result<()> {
        let _span = tracing::debug_span!("capture.open", source = uri, %api).entered();
        let handle = self.handle.as_mut().ok_or(VideoIoError::Closed)?;
        confirm_open(handle.open_file(uri, api), || uri.to_string())
    }

    pub fn open_device(&mut self, index: i32) -> Result<()> {
        self.open_device_with(index, CaptureApi::ANY)
    }

    pub fn open_device_with(&mut self, index: i32, api: CaptureApi) -> Result<()> {
        let _span = tracing::debug_span!("capture.open", device = index, %api).entered();
        let handle = self.handle.as_mut().ok_or(VideoIoError::Closed)?;
        confirm_open(handle.open_device(index, api), || format!("device #{index}"))
    }

    /// Whether the source is open and readable.
    pub fn is_opened(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| {
            handle.is_opened().unwrap_or_else(|err| {
                debug!("capture is_opened failed: {err}");
                false
            })
        })
    }

    /// Decode the next frame into `frame`.
    ///
    /// Returns `false` at end of stream or on any failure; `frame` is then
    /// left in whatever state the native library leaves it.
    pub fn read(&mut self, frame: &mut B::Frame) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };
        handle.read(frame).unwrap_or_else(|err| {
            debug!("capture read failed: {err}");
            false
        })
    }

    /// Skip up to `count` frames without decoding them. Returns how many were
    /// actually skipped; fewer than `count` means the stream ran out.
    pub fn grab(&mut self, count: usize) -> usize {
        let Some(handle) = self.handle.as_mut() else {
            return 0;
        };
        let mut grabbed = 0;
        while grabbed < count {
            match handle.grab() {
                Ok(true) => grabbed += 1,
                Ok(false) => break,
                Err(err) => {
                    debug!("capture grab failed after {grabbed} frames: {err}");
                    break;
                }
            }
        }
        grabbed
    }

    /// Native property value; unsupported keys come back as `0.0`.
    pub fn get(&self, property: CaptureProperty) -> f64 {
        self.handle.as_ref().map_or(0.0, |handle| {
            handle.get(property).unwrap_or_else(|err| {
                debug!(%property, "capture get failed: {err}");
                0.0
            })
        })
    }

    /// Returns whether the native library accepted the value.
    pub fn set(&mut self, property: CaptureProperty, value: f64) -> bool {
        self.handle.as_mut().is_some_and(|handle| {
            handle.set(property, value).unwrap_or_else(|err| {
                debug!(%property, value, "capture set failed: {err}");
                false
            })
        })
    }

    /// The codec in use as four characters, e.g. `"avc1"`.
    pub fn codec_string(&self) -> String {
        FourCc::from_property(self.get(CaptureProperty::FOURCC)).decode()
    }

    /// Pack a four-character codec name into the value the FOURCC property
    /// uses, or `-1.0` when `code` is not exactly four characters.
    pub fn encode_codec(&self, code: &str) -> f64 {
        FourCc::encode(code).map_or(-1.0, FourCc::to_property)
    }

    /// Release the native handle. Calling it again is a no-op.
    pub fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(err) = handle.release() {
                debug!("capture release failed: {err}");
            }
        }
    }
}

impl<B: CaptureBackend> Drop for VideoCapture<B> {
    fn drop(&mut self) {
        self.close();
    }
}

fn confirm_open(outcome: Result<bool>, uri: impl FnOnce() -> String) -> Result<()> {
    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => Err(VideoIoError::OpenFailed { uri: uri() }),
        Err(err) => {
            let uri = uri();
            debug!("native open of {uri:?} raised: {err}");
            Err(VideoIoError::OpenFailed { uri })
        }
    }
}
