//! Capture source selection.

use std::{convert::Infallible, fmt, str::FromStr};

use serde_json::Value;

use crate::error::VideoIoError;

/// What a capture should open.
///
/// Strings that parse as an integer select a device by index, so `"0"` is
/// device 0 and never a file named `0`. Build [`CaptureSource::Uri`] directly
/// to open such a file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CaptureSource {
    /// Numbered capture device.
    Device(i32),
    /// File path, stream URL, or pipeline descriptor.
    Uri(String),
}

impl From<i32> for CaptureSource {
    fn from(index: i32) -> Self {
        CaptureSource::Device(index)
    }
}

impl From<&str> for CaptureSource {
    fn from(value: &str) -> Self {
        match value.parse::<i32>() {
            Ok(index) => CaptureSource::Device(index),
            Err(_) => CaptureSource::Uri(value.to_string()),
        }
    }
}

impl From<String> for CaptureSource {
    fn from(value: String) -> Self {
        match value.parse::<i32>() {
            Ok(index) => CaptureSource::Device(index),
            Err(_) => CaptureSource::Uri(value),
        }
    }
}

impl FromStr for CaptureSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CaptureSource::from(s))
    }
}

/// Loosely typed input such as a config value: integers and strings are
/// accepted, anything else is [`VideoIoError::InvalidArgument`].
impl TryFrom<&Value> for CaptureSource {
    type Error = VideoIoError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(CaptureSource::from(text.as_str())),
            Value::Number(number) => number
                .as_i64()
                .and_then(|index| i32::try_from(index).ok())
                .map(CaptureSource::Device)
                .ok_or_else(|| VideoIoError::InvalidArgument(value.to_string())),
            other => Err(VideoIoError::InvalidArgument(other.to_string())),
        }
    }
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureSource::Device(index) => write!(f, "device #{index}"),
            CaptureSource::Uri(uri) => f.write_str(uri),
        }
    }
}
