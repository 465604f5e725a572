//! The primitives consumed from a native video library.
//!
//! Adapters in this crate own one backend value each and never look at frame
//! contents; everything they do is expressed through these two traits.

use crate::{
    error::Result,
    fourcc::FourCc,
    properties::{CaptureApi, CaptureProperty},
    writer::WriterTarget,
};

/// A native video source handle.
pub trait CaptureBackend: Sized {
    /// Caller-owned image buffer filled by [`CaptureBackend::read`].
    type Frame;

    /// Allocate an unopened handle.
    fn create() -> Result<Self>;

    fn open_file(&mut self, uri: &str, api: CaptureApi) -> Result<bool>;

    fn open_device(&mut self, index: i32, api: CaptureApi) -> Result<bool>;

    fn is_opened(&self) -> Result<bool>;

    /// Decode the next frame into `frame`, replacing its contents.
    fn read(&mut self, frame: &mut Self::Frame) -> Result<bool>;

    /// Advance one frame without decoding it.
    fn grab(&mut self) -> Result<bool>;

    fn get(&self, property: CaptureProperty) -> Result<f64>;

    fn set(&mut self, property: CaptureProperty, value: f64) -> Result<bool>;

    fn release(&mut self) -> Result<()>;
}

/// A native video sink handle.
///
/// Writers are shared across threads behind a lock, so the handle itself must
/// be movable between threads.
pub trait WriterBackend: Sized + Send {
    type Frame;

    fn create() -> Result<Self>;

    /// Open `target` for writing frames of `frame_size` (width, height).
    fn open(
        &mut self,
        target: &WriterTarget,
        fourcc: FourCc,
        fps: f64,
        frame_size: (i32, i32),
        is_color: bool,
    ) -> Result<bool>;

    fn is_opened(&self) -> Result<bool>;

    fn write(&mut self, frame: &Self::Frame) -> Result<()>;

    fn release(&mut self) -> Result<()>;
}
