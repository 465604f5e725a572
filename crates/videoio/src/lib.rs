//! Ownership-safe binding over OpenCV video capture and video writing.
//!
//! The crate adds no video logic of its own. It owns native handles, forwards
//! calls to them, and converts codec codes:
//! - `capture`: [`VideoCapture`], reading frames and properties from a source.
//! - `writer`: [`VideoWriter`], pushing frames into a file or pipeline sink.
//! - `source`: [`CaptureSource`], the device-or-URI selector.
//! - `fourcc`: [`FourCc`] packing and unpacking.
//! - `properties`: the property key and backend id tables.
//! - `backend`: traits naming the native primitives the adapters use.
//!
//! Enable the `with-opencv` feature for the OpenCV backends
//! (`OpenCvVideoCapture`, `OpenCvVideoWriter`).
//!
//! ```ignore
//! use cv_videoio::{CaptureProperty, Mat, OpenCvVideoCapture};
//!
//! let mut capture = OpenCvVideoCapture::open_source("0")?;
//! let width = capture.get(CaptureProperty::FRAME_WIDTH);
//! let mut frame = Mat::default();
//! while capture.read(&mut frame) {
//!     // frame is reused for every read
//! }
//! ```

pub use backend::{CaptureBackend, WriterBackend};
pub use capture::VideoCapture;
pub use error::{Result, VideoIoError};
pub use fourcc::FourCc;
#[cfg(feature = "with-opencv")]
pub use native::{Mat, OpenCvCapture, OpenCvVideoCapture, OpenCvVideoWriter, OpenCvWriter};
pub use properties::{CaptureApi, CaptureProperty};
pub use source::CaptureSource;
pub use writer::{VideoWriter, WriterParams, WriterTarget};

mod backend;
mod capture;
mod error;
mod fourcc;
#[cfg(feature = "with-opencv")]
mod native;
mod properties;
mod source;
mod writer;
