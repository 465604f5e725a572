use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use cv_videoio::{CaptureApi, CaptureProperty, FourCc};

use crate::config::{CopyArgs, CopyConfig, ProbeArgs, ProbeConfig, PropsArgs, PropsConfig};

#[derive(Debug, Parser)]
#[command(name = "vio", version, about = "Inspect and copy video sources through OpenCV")]
pub struct Cli {
    /// Log debug output (RUST_LOG takes precedence).
    #[arg(long, global = true, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open a source and print its stream properties.
    Probe(ProbeArgs),
    /// Set capture properties, then print every known property.
    Props(PropsArgs),
    /// Copy frames from a source into a file or pipeline sink.
    Copy(CopyArgs),
    /// Convert between a four-character codec name and its integer code.
    Fourcc {
        /// Four characters (`MJPG`) or an integer code (`1196444237`,
        /// `0x47504A4D`). Four characters always name a codec.
        #[arg(value_name = "CODE", allow_negative_numbers = true)]
        code: String,
    },
    /// Print one of the native id tables.
    List {
        #[arg(value_enum)]
        table: Table,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Table {
    Properties,
    Backends,
}

pub fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Probe(args) => run_probe(ProbeConfig::try_from(args)?),
        Command::Props(args) => run_props(PropsConfig::try_from(args)?),
        Command::Copy(args) => run_copy(CopyConfig::try_from(args)?),
        Command::Fourcc { code } => {
            println!("{}", describe_fourcc(&code)?);
            Ok(())
        }
        Command::List { table } => {
            for line in table_lines(table) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

#[cfg(feature = "with-opencv")]
fn run_probe(config: ProbeConfig) -> Result<()> {
    crate::probe::run_probe(config)
}

#[cfg(feature = "with-opencv")]
fn run_props(config: PropsConfig) -> Result<()> {
    crate::probe::run_props(config)
}

#[cfg(feature = "with-opencv")]
fn run_copy(config: CopyConfig) -> Result<()> {
    crate::copy::run(config)
}

#[cfg(not(feature = "with-opencv"))]
fn run_probe(_config: ProbeConfig) -> Result<()> {
    bail!(NATIVE_HINT)
}

#[cfg(not(feature = "with-opencv"))]
fn run_props(_config: PropsConfig) -> Result<()> {
    bail!(NATIVE_HINT)
}

#[cfg(not(feature = "with-opencv"))]
fn run_copy(_config: CopyConfig) -> Result<()> {
    bail!(NATIVE_HINT)
}

#[cfg(not(feature = "with-opencv"))]
const NATIVE_HINT: &str =
    "this build has no OpenCV backend; rebuild with `--features with-opencv` to open video sources";

/// `MJPG` -> its integer code, an integer -> its characters.
///
/// Exactly four characters are a codec name even when they are digits, so a
/// four-digit code has to be written in hex (`0x4D2`).
fn describe_fourcc(code: &str) -> Result<String> {
    let hex = code.strip_prefix("0x").or_else(|| code.strip_prefix("0X"));
    if hex.is_none() {
        if let Some(fourcc) = FourCc::encode(code) {
            return Ok(format!("{code:?} = {} (0x{:08X})", fourcc.to_property(), fourcc.code()));
        }
    }
    let value = match hex {
        Some(digits) => u32::from_str_radix(digits, 16)
            .with_context(|| format!("{code:?} is not a 32-bit hex code"))?,
        None => parse_code(code)?,
    };
    Ok(format!("{code} = {:?}", FourCc::new(value).decode()))
}

/// Signed values are the FOURCC property as OpenCV reports it; unsigned ones
/// the packed code itself.
fn parse_code(code: &str) -> Result<u32> {
    if let Ok(value) = code.parse::<i32>() {
        return Ok(value as u32);
    }
    if let Ok(value) = code.parse::<u32>() {
        return Ok(value);
    }
    bail!("expected four characters or a 32-bit integer code, got {code:?}")
}

fn table_lines(table: Table) -> Vec<String> {
    match table {
        Table::Properties => CaptureProperty::KNOWN
            .iter()
            .map(|(label, property)| format!("{:>4}  {label}", property.id()))
            .collect(),
        Table::Backends => CaptureApi::KNOWN
            .iter()
            .map(|(label, api)| format!("{:>4}  {label}", api.id()))
            .collect(),
    }
}
