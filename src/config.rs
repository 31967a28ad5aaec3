//! Command line surface and the validated run configuration.
//!
//! ```text
//! bloc shot1.png shot2.jpg -o clean1.png -c ff00ff
//! ```
//! Outputs pair up with inputs in order; inputs without one are written
//! next to the original as `<name>.bloc<ext>`.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::error::Error;
use crate::types::Color;

/// Black out rectangular regions of images.
///
/// Click two corners to add a box. U undoes, R redoes, Enter moves on to the
/// next image (exporting the current one), Escape exports and quits.
/// Mouse wheel zooms around the pointer, arrow keys or WASD pan.
#[derive(Parser, Debug)]
#[command(name = "bloc", version)]
pub struct Cli {
    /// Images to redact, shown one after another.
    #[arg(value_name = "IMAGE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Where to write a redacted image. Repeat once per input, in input order.
    #[arg(short = 'o', long = "output", value_name = "PATH", action = ArgAction::Append)]
    pub outputs: Vec<PathBuf>,

    /// Redaction color as six hex digits.
    #[arg(short = 'c', long = "color", value_name = "RRGGBB", default_value_t = Color::BLACK, value_parser = parse_color)]
    pub color: Color,

    /// JPEG export quality.
    #[arg(short = 'q', long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::from_hex(s).map_err(|e| e.to_string())
}

/// One image to process: where it comes from and where it goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub jobs: Vec<Job>,
    pub color: Color,
    pub quality: u8,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, Error> {
        if cli.inputs.is_empty() {
            return Err(Error::Config("no input images given".into()));
        }
        if cli.outputs.len() > cli.inputs.len() {
            return Err(Error::Config(format!(
                "{} output paths given for {} input images; output '{}' has no input",
                cli.outputs.len(),
                cli.inputs.len(),
                cli.outputs[cli.inputs.len()].display()
            )));
        }

        let mut outputs = cli.outputs.into_iter();
        let jobs = cli
            .inputs
            .into_iter()
            .map(|input| {
                let output = outputs.next().unwrap_or_else(|| default_output(&input));
                Job { input, output }
            })
            .collect();

        Ok(Self { jobs, color: cli.color, quality: cli.quality })
    }

    /// Parse and validate process-style arguments (program name first).
    #[cfg(test)]
    pub fn try_from_args<I, T>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| Error::Config(e.to_string()))?;
        Self::from_cli(cli)
    }
}

/// `dir/name.ext` -> `dir/name.bloc.ext`; no extension gives `dir/name.bloc`.
pub fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    let mut name = stem;
    name.push(".bloc");
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}
