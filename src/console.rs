//! Handling the geolens CLI
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog, version information, etc.).
use crate::{
    error::{OpticsError, OpticsResult},
    get_version,
    ray_tracer::RaysMode,
};
use clap::{
    builder::{OsStr, Str},
    Parser,
};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// First line of every snapshot written by the CLI.
///
/// Scene documents use centimeter, the snapshot is a plain serialization of the computed values in SI units.
pub const SNAPSHOT_HEADER: &str = "# geolens scene snapshot: all lengths in meter (SI units)";

/// Command line arguments for the geolens application.
#[derive(Debug)]
pub struct Args {
    /// file path of the scene description, which should be read in
    pub file_path: PathBuf,
    /// rays mode overriding the mode of the scene description
    pub rays_mode: Option<RaysMode>,
    /// destination file of the scene snapshot. if not defined, the snapshot is printed to stdout
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(author, version = Str::from(&get_version()), about, long_about = None)]
pub struct PartialArgs {
    /// filepath of the scene description (.yaml) to read in
    #[arg(short, long)]
    file_path: String,

    /// rays mode (marginal, principal, many or none) overriding the mode of the scene description
    #[arg(short, long)]
    rays_mode: Option<String>,

    /// destination file of the scene snapshot (all lengths in meter). if not defined, the snapshot is printed to
    /// stdout
    #[arg(short, long)]
    output: Option<String>,
}

/// Checks if the passed file path is an existing YAML file.
fn file_path_is_valid(path: &Path) -> bool {
    Path::is_file(path)
        && (path.extension() == Some(&OsStr::from("yaml"))
            || path.extension() == Some(&OsStr::from("yml")))
}

fn eval_file_path_input(file_path: &str) -> Option<PathBuf> {
    if file_path_is_valid(Path::new(file_path)) {
        Some(PathBuf::from(file_path))
    } else {
        None
    }
}

/// Evaluates the rays mode string (case insensitive).
fn eval_rays_mode_input(rays_mode_input: &str) -> Option<RaysMode> {
    RaysMode::iter().find(|mode| mode.to_string().eq_ignore_ascii_case(rays_mode_input.trim()))
}

/// Evaluates the output path. The parent directory of the file must exist.
fn eval_output_input(output: &str) -> Option<PathBuf> {
    let path = Path::new(output);
    if output.is_empty() || path.is_dir() {
        return None;
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => None,
        _ => Some(PathBuf::from(output)),
    }
}

impl TryFrom<PartialArgs> for Args {
    type Error = OpticsError;

    fn try_from(part_args: PartialArgs) -> OpticsResult<Self> {
        let file_path = eval_file_path_input(&part_args.file_path).ok_or_else(|| {
            OpticsError::Console(format!(
                "invalid scene file path '{}': file must exist and have a .yaml extension",
                part_args.file_path
            ))
        })?;
        let rays_mode = part_args
            .rays_mode
            .as_deref()
            .map(|input| {
                eval_rays_mode_input(input).ok_or_else(|| {
                    let modes: Vec<String> = RaysMode::iter()
                        .map(|m| m.to_string().to_lowercase())
                        .collect();
                    OpticsError::Console(format!(
                        "invalid rays mode '{input}', valid modes: {}",
                        modes.join(", ")
                    ))
                })
            })
            .transpose()?;
        let output = part_args
            .output
            .as_deref()
            .map(|input| {
                eval_output_input(input).ok_or_else(|| {
                    OpticsError::Console(format!("invalid output file path '{input}'"))
                })
            })
            .transpose()?;
        Ok(Self {
            file_path,
            rays_mode,
            output,
        })
    }
}

/// Creates the intro string shown at program start.
#[must_use]
fn create_intro() -> String {
    format!(
        "{: ^80}\n{: ^80}\n",
        "geolens - geometric optics of thin lenses and mirrors",
        "version ".to_owned() + &get_version()
    )
}

/// Show the intro and the CLI version information.
pub fn show_intro() {
    println!("{}", create_intro());
}
