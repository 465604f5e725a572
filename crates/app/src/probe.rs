use anyhow::{Context, Result};
use cv_videoio::{CaptureProperty, OpenCvVideoCapture};
use serde::Serialize;
use tracing::warn;

use crate::config::{ProbeConfig, PropsConfig};

#[derive(Debug, Serialize)]
struct ProbeReport {
    source: String,
    backend: String,
    opened: bool,
    width: f64,
    height: f64,
    fps: f64,
    frame_count: f64,
    codec: String,
}

pub(crate) fn run_probe(config: ProbeConfig) -> Result<()> {
    let mut capture = OpenCvVideoCapture::new()?;
    capture
        .open_with(&config.source, config.api)
        .with_context(|| format!("probing {}", config.source))?;

    let report = ProbeReport {
        source: config.source.to_string(),
        backend: config.api.to_string(),
        opened: capture.is_opened(),
        width: capture.get(CaptureProperty::FRAME_WIDTH),
        height: capture.get(CaptureProperty::FRAME_HEIGHT),
        fps: capture.get(CaptureProperty::FPS),
        frame_count: capture.get(CaptureProperty::FRAME_COUNT),
        codec: capture.codec_string(),
    };

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("source:      {}", report.source);
        println!("backend:     {}", report.backend);
        println!("opened:      {}", report.opened);
        println!("size:        {}x{}", report.width, report.height);
        println!("fps:         {}", report.fps);
        println!("frame count: {}", report.frame_count);
        println!("codec:       {:?}", report.codec);
    }
    Ok(())
}

pub(crate) fn run_props(config: PropsConfig) -> Result<()> {
    let mut capture = OpenCvVideoCapture::new()?;
    capture
        .open_with(&config.source, config.api)
        .with_context(|| format!("opening {}", config.source))?;

    for (property, value) in &config.assignments {
        if !capture.set(*property, *value) {
            warn!("{property} = {value} was not accepted by the backend");
        }
    }

    for (label, property) in CaptureProperty::KNOWN {
        println!("{:>4}  {label:<22} {}", property.id(), capture.get(*property));
    }
    Ok(())
}
