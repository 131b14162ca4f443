// Command-line pipeline: remove the background of one image and, unless
// this is a dry run, upload the cut-out to Floriday.

use crate::api::{FloridayClient, MediaItem};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::magic_wand::{remove_background, transparent_output_path, BackgroundRemover};
use clap::Parser;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "floriday-magic-wand",
    version,
    about = "Magic wand: afbeelding vrijstaand maken en uploaden naar Floriday media library."
)]
pub struct CliArgs {
    /// Pad naar de bronafbeelding
    #[arg(required_unless_present = "interactive")]
    pub input_image: Option<PathBuf>,

    /// Output map voor vrijstaande PNG
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Optionele titel voor Floriday media
    #[arg(long)]
    pub title: Option<String>,

    /// Voer alleen background removal uit en sla upload over
    #[arg(long)]
    pub dry_run: bool,

    /// Start het interactieve menu
    #[arg(short, long)]
    pub interactive: bool,
}

/// What one pipeline run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub output_path: PathBuf,
    /// Floriday's answer, `None` on a dry run.
    pub upload: Option<MediaItem>,
}

/// Remove the background of `source` into `<output_dir>/<stem>-transparent.png`
/// and upload it. `load_config` is only called when an upload happens, so a
/// dry run never touches the API configuration or the network.
pub fn run_pipeline<F>(
    source: &Path,
    output_dir: &Path,
    title: Option<&str>,
    dry_run: bool,
    remover: &dyn BackgroundRemover,
    load_config: F,
    out: &mut dyn Write,
) -> Result<PipelineOutcome>
where
    F: FnOnce() -> Result<ClientConfig>,
{
    let output_path = transparent_output_path(output_dir, source);
    let cleaned = remove_background(remover, source, &output_path)?;
    writeln!(out, "Vrijstaande afbeelding opgeslagen: {}", cleaned.display())?;

    if dry_run {
        writeln!(out, "Dry run actief: upload overgeslagen.")?;
        return Ok(PipelineOutcome {
            output_path: cleaned,
            upload: None,
        });
    }

    let client = FloridayClient::new(load_config()?)?;
    let response = client.upload_media(&cleaned, title, None)?;
    info!(file = %cleaned.display(), "Upload finished");
    writeln!(out, "Upload succesvol.")?;
    writeln!(
        out,
        "{}",
        serde_json::to_string_pretty(&Value::Object(response.clone()))?
    )?;

    Ok(PipelineOutcome {
        output_path: cleaned,
        upload: Some(response),
    })
}
