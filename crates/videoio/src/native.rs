//! OpenCV `videoio` backends.

pub use opencv::core::Mat;
use opencv::{core::Size, prelude::*, videoio};

use crate::{
    backend::{CaptureBackend, WriterBackend},
    capture::VideoCapture,
    error::Result,
    fourcc::FourCc,
    properties::{CaptureApi, CaptureProperty},
    writer::{VideoWriter, WriterTarget},
};

/// Capture adapter over `cv::VideoCapture`.
pub type OpenCvVideoCapture = VideoCapture<OpenCvCapture>;
/// Writer adapter over `cv::VideoWriter`.
pub type OpenCvVideoWriter = VideoWriter<OpenCvWriter>;

pub struct OpenCvCapture(videoio::VideoCapture);

impl CaptureBackend for OpenCvCapture {
    type Frame = Mat;

    fn create() -> Result<Self> {
        Ok(Self(videoio::VideoCapture::default()?))
    }

    fn open_file(&mut self, uri: &str, api: CaptureApi) -> Result<bool> {
        Ok(self.0.open_file(uri, api.id())?)
    }

    fn open_device(&mut self, index: i32, api: CaptureApi) -> Result<bool> {
        Ok(self.0.open(index, api.id())?)
    }

    fn is_opened(&self) -> Result<bool> {
        Ok(self.0.is_opened()?)
    }

    fn read(&mut self, frame: &mut Mat) -> Result<bool> {
        Ok(self.0.read(frame)?)
    }

    fn grab(&mut self) -> Result<bool> {
        Ok(self.0.grab()?)
    }

    fn get(&self, property: CaptureProperty) -> Result<f64> {
        Ok(self.0.get(property.id())?)
    }

    fn set(&mut self, property: CaptureProperty, value: f64) -> Result<bool> {
        Ok(self.0.set(property.id(), value)?)
    }

    fn release(&mut self) -> Result<()> {
        Ok(self.0.release()?)
    }
}

pub struct OpenCvWriter(videoio::VideoWriter);

impl WriterBackend for OpenCvWriter {
    type Frame = Mat;

    fn create() -> Result<Self> {
        Ok(Self(videoio::VideoWriter::default()?))
    }

    fn open(
        &mut self,
        target: &WriterTarget,
        fourcc: FourCc,
        fps: f64,
        frame_size: (i32, i32),
        is_color: bool,
    ) -> Result<bool> {
        let size = Size::new(frame_size.0, frame_size.1);
        let opened = match target {
            WriterTarget::File(path) => self.0.open(path, fourcc.into(), fps, size, is_color)?,
            WriterTarget::Pipeline { descriptor, api } => self.0.open_with_backend(
                descriptor,
                api.id(),
                fourcc.into(),
                fps,
                size,
                is_color,
            )?,
        };
        Ok(opened)
    }

    fn is_opened(&self) -> Result<bool> {
        Ok(self.0.is_opened()?)
    }

    fn write(&mut self, frame: &Mat) -> Result<()> {
        Ok(self.0.write(frame)?)
    }

    fn release(&mut self) -> Result<()> {
        Ok(self.0.release()?)
    }
}
