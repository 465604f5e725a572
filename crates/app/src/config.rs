//! Translation of subcommand arguments into validated run configurations.
//!
//! Each `*Args` struct is what clap parses; the matching `*Config` is what the
//! commands consume without re-checking flags.

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use cv_videoio::{CaptureApi, CaptureProperty, CaptureSource, FourCc, WriterTarget};

/// Frame rate used when neither `--fps` nor the source reports one.
#[cfg_attr(not(feature = "with-opencv"), allow(dead_code))]
pub(crate) const DEFAULT_FPS: f64 = 30.0;

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Device index, file path, URL, or pipeline descriptor.
    #[arg(value_name = "SOURCE")]
    pub source: String,
    /// Backend name or id (`ffmpeg`, `gstreamer`, `v4l2`, `1800`, ...).
    #[arg(long, value_name = "API")]
    pub backend: Option<String>,
    /// Print the report as JSON.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProbeConfig {
    pub source: CaptureSource,
    pub api: CaptureApi,
    pub json: bool,
}

impl TryFrom<ProbeArgs> for ProbeConfig {
    type Error = anyhow::Error;

    fn try_from(args: ProbeArgs) -> Result<Self> {
        Ok(Self {
            source: CaptureSource::from(args.source),
            api: parse_api(args.backend.as_deref())?,
            json: args.json,
        })
    }
}

#[derive(Debug, Args)]
pub struct PropsArgs {
    #[arg(value_name = "SOURCE")]
    pub source: String,
    #[arg(long, value_name = "API")]
    pub backend: Option<String>,
    /// Property assignment applied before printing, e.g. `brightness=100`.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub assignments: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropsConfig {
    pub source: CaptureSource,
    pub api: CaptureApi,
    pub assignments: Vec<(CaptureProperty, f64)>,
}

impl TryFrom<PropsArgs> for PropsConfig {
    type Error = anyhow::Error;

    fn try_from(args: PropsArgs) -> Result<Self> {
        let assignments = args
            .assignments
            .iter()
            .map(|raw| parse_assignment(raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            source: CaptureSource::from(args.source),
            api: parse_api(args.backend.as_deref())?,
            assignments,
        })
    }
}

#[derive(Debug, Args)]
pub struct CopyArgs {
    #[arg(value_name = "SOURCE")]
    pub source: String,
    /// Output file, or a pipeline descriptor with `--pipeline`.
    #[arg(value_name = "OUTPUT")]
    pub output: String,
    /// Four-character output codec.
    #[arg(long, default_value = "MJPG")]
    pub codec: String,
    /// Output frame rate; defaults to the source's.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f64>,
    /// Output width; defaults to the source's.
    #[arg(long, value_name = "PX")]
    pub width: Option<i32>,
    /// Output height; defaults to the source's.
    #[arg(long, value_name = "PX")]
    pub height: Option<i32>,
    /// Stop after this many frames.
    #[arg(long, value_name = "N")]
    pub frames: Option<usize>,
    /// Frames skipped before copying starts.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub skip: usize,
    /// Treat OUTPUT as a pipeline descriptor.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub pipeline: bool,
    /// Backend for the source.
    #[arg(long = "source-backend", value_name = "API")]
    pub source_backend: Option<String>,
    /// Backend interpreting the output pipeline (default `gstreamer`).
    #[arg(long, value_name = "API", requires = "pipeline")]
    pub backend: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CopyConfig {
    pub source: CaptureSource,
    pub source_api: CaptureApi,
    pub target: WriterTarget,
    pub codec: FourCc,
    pub fps: Option<f64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub frame_limit: Option<usize>,
    pub skip: usize,
}

impl TryFrom<CopyArgs> for CopyConfig {
    type Error = anyhow::Error;

    fn try_from(args: CopyArgs) -> Result<Self> {
        let codec = args
            .codec
            .parse::<FourCc>()
            .with_context(|| "--codec must be exactly four characters".to_string())?;

        if let Some(fps) = args.fps {
            if !(fps.is_finite() && fps > 0.0) {
                bail!("--fps must be a positive number");
            }
        }
        if args.width.is_some_and(|w| w <= 0) || args.height.is_some_and(|h| h <= 0) {
            bail!("--width and --height must be positive integers");
        }
        if args.frames == Some(0) {
            bail!("--frames must be at least 1");
        }

        let target = if args.pipeline {
            let api = match args.backend.as_deref() {
                Some(name) => parse_api(Some(name))?,
                None => CaptureApi::GSTREAMER,
            };
            WriterTarget::Pipeline {
                descriptor: args.output,
                api,
            }
        } else {
            WriterTarget::File(args.output)
        };

        Ok(Self {
            source: CaptureSource::from(args.source),
            source_api: parse_api(args.source_backend.as_deref())?,
            target,
            codec,
            fps: args.fps,
            width: args.width,
            height: args.height,
            frame_limit: args.frames,
            skip: args.skip,
        })
    }
}

fn parse_api(name: Option<&str>) -> Result<CaptureApi> {
    match name {
        Some(name) => name
            .parse::<CaptureApi>()
            .map_err(|_| anyhow!("unknown backend {name:?}; see `vio list backends`")),
        None => Ok(CaptureApi::ANY),
    }
}

fn parse_assignment(raw: &str) -> Result<(CaptureProperty, f64)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("--set expects NAME=VALUE, got {raw:?}"))?;
    let property = name
        .parse::<CaptureProperty>()
        .map_err(|_| anyhow!("unknown property {name:?}; see `vio list properties`"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("value for {name} must be a number"))?;
    Ok((property, value))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::{Cli, Command};

    fn copy_config(args: &[&str]) -> Result<CopyConfig> {
        let argv = ["vio", "copy"].iter().chain(args).copied();
        match Cli::try_parse_from(argv)?.command {
            Command::Copy(args) => CopyConfig::try_from(args),
            other => bail!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn copy_defaults_follow_the_source() {
        let config = copy_config(&["0", "out.avi"]).expect("config");
        assert_eq!(
            config,
            CopyConfig {
                source: CaptureSource::Device(0),
                source_api: CaptureApi::ANY,
                target: WriterTarget::File("out.avi".into()),
                codec: FourCc::encode("MJPG").expect("codec"),
                fps: None,
                width: None,
                height: None,
                frame_limit: None,
                skip: 0,
            }
        );
    }

    #[test]
    fn copy_to_a_pipeline_defaults_to_gstreamer() {
        let config = copy_config(&[
            "videotestsrc ! appsink",
            "appsrc ! videoconvert ! autovideosink",
            "--pipeline",
            "--codec",
            "avc1",
            "--frames",
            "100",
        ])
        .expect("config");
        assert_eq!(config.source, CaptureSource::Uri("videotestsrc ! appsink".into()));
        assert_eq!(
            config.target,
            WriterTarget::Pipeline {
                descriptor: "appsrc ! videoconvert ! autovideosink".into(),
                api: CaptureApi::GSTREAMER,
            }
        );
        assert_eq!(config.frame_limit, Some(100));
    }

    #[test]
    fn copy_rejects_bad_values() {
        assert!(copy_config(&["0", "out.avi", "--codec", "MJPEG"]).is_err());
        assert!(copy_config(&["0", "out.avi", "--fps", "0"]).is_err());
        assert!(copy_config(&["0", "out.avi", "--width", "0"]).is_err());
        assert!(copy_config(&["0", "out.avi", "--frames", "0"]).is_err());
        assert!(copy_config(&["0", "out", "--pipeline", "--backend", "nope"]).is_err());
        assert!(copy_config(&["0", "out.avi", "--backend", "ffmpeg"]).is_err());
    }

    #[test]
    fn probe_resolves_backend_names() {
        let config = ProbeConfig::try_from(ProbeArgs {
            source: "clip.mp4".into(),
            backend: Some("ffmpeg".into()),
            json: true,
        })
        .expect("config");
        assert_eq!(config.source, CaptureSource::Uri("clip.mp4".into()));
        assert_eq!(config.api, CaptureApi::FFMPEG);
    }

    #[test]
    fn props_parse_assignments() {
        let config = PropsConfig::try_from(PropsArgs {
            source: "1".into(),
            backend: None,
            assignments: vec!["brightness=100".into(), "CAP_PROP_FPS = 15".into()],
        })
        .expect("config");
        assert_eq!(config.source, CaptureSource::Device(1));
        assert_eq!(
            config.assignments,
            vec![
                (CaptureProperty::BRIGHTNESS, 100.0),
                (CaptureProperty::FPS, 15.0),
            ]
        );
        assert!(parse_assignment("brightness").is_err());
        assert!(parse_assignment("nope=1").is_err());
        assert!(parse_assignment("gain=high").is_err());
    }
}
