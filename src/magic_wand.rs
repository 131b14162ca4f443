// The "magic wand": strip the background from an image on disk.
//
// The actual segmentation is an external capability behind
// `BackgroundRemover`. The production implementation, `RembgCommand`,
// pipes the image through the `rembg` command-line tool.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, info};

/// Default program used by [`RembgCommand`].
pub const DEFAULT_REMOVER: &str = "rembg";

/// Turns image bytes into image bytes without a background (PNG with
/// transparency by convention, not verified).
pub trait BackgroundRemover: Send + Sync {
    fn remove(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Runs `<program> i - -`, writing the image to stdin and reading the
/// cut-out from stdout.
#[derive(Debug, Clone)]
pub struct RembgCommand {
    program: String,
}

impl RembgCommand {
    pub fn new(program: impl Into<String>) -> Self {
        RembgCommand {
            program: program.into(),
        }
    }

    /// Program from `MAGIC_WAND_REMOVER`, falling back to `rembg`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("MAGIC_WAND_REMOVER").unwrap_or_else(|_| DEFAULT_REMOVER.into()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for RembgCommand {
    fn default() -> Self {
        Self::new(DEFAULT_REMOVER)
    }
}

impl BackgroundRemover for RembgCommand {
    fn remove(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(["i", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => Error::DependencyMissing(format!(
                    "Dependency '{}' ontbreekt. Installeer rembg (pip install \"rembg[cli]\") \
                     of gebruik de dry-run modus.",
                    self.program
                )),
                _ => Error::Io(err),
            })?;

        // Stdin is fed from its own thread while stdout drains.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("stdin van rembg niet beschikbaar")))?;
        let payload = input.to_vec();
        let writer = thread::spawn(move || stdin.write_all(&payload));

        let output = child.wait_with_output()?;
        let status = output.status;

        match writer.join() {
            Ok(result) => {
                // A remover that exits early closes stdin; its exit status
                // tells the real story.
                if status.success() {
                    result?;
                }
            }
            Err(_) => {
                return Err(Error::Io(std::io::Error::other("schrijven naar rembg is mislukt")));
            }
        }

        if !status.success() {
            return Err(Error::Removal {
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Remove the background of `input_image` and write the result to
/// `output_image`, creating its parent directories. Nothing is written when
/// the input does not exist.
pub fn remove_background(
    remover: &dyn BackgroundRemover,
    input_image: &Path,
    output_image: &Path,
) -> Result<PathBuf> {
    if !input_image.exists() {
        return Err(Error::NotFound(input_image.to_path_buf()));
    }

    if let Some(parent) = output_image.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let input_bytes = std::fs::read(input_image)?;
    debug!(input = %input_image.display(), bytes = input_bytes.len(), "Removing background");
    let output_bytes = remover.remove(&input_bytes)?;
    std::fs::write(output_image, &output_bytes)?;

    info!(
        input = %input_image.display(),
        output = %output_image.display(),
        bytes = output_bytes.len(),
        "Background removed"
    );
    Ok(output_image.to_path_buf())
}

/// `<output_dir>/<stem>-transparent.png` for a source image.
pub fn transparent_output_path(output_dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    output_dir.join(format!("{stem}-transparent.png"))
}
