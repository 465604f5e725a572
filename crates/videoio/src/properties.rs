//! Integer tables shared with the native library.
//!
//! Property keys and backend ids are part of OpenCV's ABI. Both are kept as
//! open newtypes so values missing from the tables still pass through
//! verbatim; the named constants only give the well-known ones a spelling.

use std::{fmt, str::FromStr};

use crate::error::VideoIoError;

macro_rules! integer_table {
    (
        $ty:ident, $prefix:literal {
            $( $(#[$meta:meta])* $name:ident = $value:literal => $label:literal, )*
        }
    ) => {
        impl $ty {
            $( $(#[$meta])* pub const $name: Self = Self($value); )*

            /// Every named entry, in native order. Aliases follow their canonical entry.
            pub const KNOWN: &'static [(&'static str, Self)] = &[ $( ($label, Self::$name), )* ];

            pub const fn id(self) -> i32 {
                self.0
            }

            /// Canonical label for the value, if it is a named entry.
            pub fn name(self) -> Option<&'static str> {
                Self::KNOWN
                    .iter()
                    .find(|(_, entry)| *entry == self)
                    .map(|(label, _)| *label)
            }
        }

        impl From<i32> for $ty {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$ty> for i32 {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(label) => f.write_str(label),
                    None => write!(f, "{}", self.0),
                }
            }
        }

        /// Accepts a label (`frame-width`, `FRAME_WIDTH`), the OpenCV constant
        /// name, or a raw integer.
        impl FromStr for $ty {
            type Err = VideoIoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if let Ok(id) = trimmed.parse::<i32>() {
                    return Ok(Self(id));
                }
                let normalized = trimmed.to_ascii_lowercase().replace('-', "_");
                let label = normalized.strip_prefix($prefix).unwrap_or(&normalized);
                Self::KNOWN
                    .iter()
                    .find(|(known, _)| *known == label)
                    .map(|(_, entry)| *entry)
                    .ok_or_else(|| {
                        VideoIoError::InvalidArgument(format!(
                            "unknown {} {s:?}",
                            stringify!($ty)
                        ))
                    })
            }
        }
    };
}

/// Key of a capture property passed to `get`/`set`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureProperty(pub i32);

integer_table!(CaptureProperty, "cap_prop_" {
    /// Current position in milliseconds.
    POS_MSEC = 0 => "pos_msec",
    /// 0-based index of the frame decoded next.
    POS_FRAMES = 1 => "pos_frames",
    /// Relative position: 0 is the start, 1 the end.
    POS_AVI_RATIO = 2 => "pos_avi_ratio",
    FRAME_WIDTH = 3 => "frame_width",
    FRAME_HEIGHT = 4 => "frame_height",
    FPS = 5 => "fps",
    /// Codec code, see [`crate::FourCc`].
    FOURCC = 6 => "fourcc",
    FRAME_COUNT = 7 => "frame_count",
    /// Format of the frames returned by `retrieve`.
    FORMAT = 8 => "format",
    /// Backend-specific capture mode.
    MODE = 9 => "mode",
    BRIGHTNESS = 10 => "brightness",
    CONTRAST = 11 => "contrast",
    SATURATION = 12 => "saturation",
    HUE = 13 => "hue",
    GAIN = 14 => "gain",
    EXPOSURE = 15 => "exposure",
    /// Whether frames are converted to RGB.
    CONVERT_RGB = 16 => "convert_rgb",
    WHITE_BALANCE_BLUE_U = 17 => "white_balance_blue_u",
    /// Stereo rectification flag (DC1394 v2 only).
    RECTIFICATION = 18 => "rectification",
    MONOCHROME = 19 => "monochrome",
    SHARPNESS = 20 => "sharpness",
    AUTO_EXPOSURE = 21 => "auto_exposure",
    GAMMA = 22 => "gamma",
    TEMPERATURE = 23 => "temperature",
    TRIGGER = 24 => "trigger",
    TRIGGER_DELAY = 25 => "trigger_delay",
    WHITE_BALANCE_RED_V = 26 => "white_balance_red_v",
    ZOOM = 27 => "zoom",
    FOCUS = 28 => "focus",
    GUID = 29 => "guid",
    ISO_SPEED = 30 => "iso_speed",
    BACKLIGHT = 32 => "backlight",
    PAN = 33 => "pan",
    TILT = 34 => "tilt",
    ROLL = 35 => "roll",
    IRIS = 36 => "iris",
    /// Opens the driver settings dialog (DSHOW only); the value is ignored.
    SETTINGS = 37 => "settings",
    BUFFER_SIZE = 38 => "buffer_size",
    AUTOFOCUS = 39 => "autofocus",
});

/// Backend preference selecting which native subsystem services an open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureApi(pub i32);

integer_table!(CaptureApi, "cap_" {
    /// Let the library pick.
    ANY = 0 => "any",
    V4L = 200 => "v4l",
    VFW = 200 => "vfw",
    V4L2 = 200 => "v4l2",
    FIREWIRE = 300 => "firewire",
    FIREWARE = 300 => "fireware",
    IEEE1394 = 300 => "ieee1394",
    DC1394 = 300 => "dc1394",
    CMU1394 = 300 => "cmu1394",
    QT = 500 => "qt",
    UNICAP = 600 => "unicap",
    DSHOW = 700 => "dshow",
    PVAPI = 800 => "pvapi",
    OPENNI = 900 => "openni",
    OPENNI_ASUS = 910 => "openni_asus",
    ANDROID = 1000 => "android",
    XIAPI = 1100 => "xiapi",
    AVFOUNDATION = 1200 => "avfoundation",
    GIGANETIX = 1300 => "giganetix",
    MSMF = 1400 => "msmf",
    WINRT = 1410 => "winrt",
    INTELPERC = 1500 => "intelperc",
    OPENNI2 = 1600 => "openni2",
    OPENNI2_ASUS = 1610 => "openni2_asus",
    GPHOTO2 = 1700 => "gphoto2",
    GSTREAMER = 1800 => "gstreamer",
    FFMPEG = 1900 => "ffmpeg",
    IMAGES = 2000 => "images",
    ARAVIS = 2100 => "aravis",
    OPENCV_MJPEG = 2200 => "opencv_mjpeg",
    INTEL_MFX = 2300 => "intel_mfx",
    XINE = 2400 => "xine",
});
