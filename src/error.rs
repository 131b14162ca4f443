use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the magic wand can report. User-facing messages are Dutch,
/// like the rest of the UI.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration, e.g. an empty `FLORIDAY_TOKEN`.
    #[error("{0}")]
    Configuration(String),

    #[error("Bestand niet gevonden: {}", .0.display())]
    NotFound(PathBuf),

    /// The background-removal tool is not installed.
    #[error("{0}")]
    DependencyMissing(String),

    /// The remover ran but reported a failure.
    #[error("Achtergrond verwijderen mislukt ({status}): {stderr}")]
    Removal { status: String, stderr: String },

    /// Floriday answered with a non-2xx status.
    #[error("Floriday request mislukt ({status}): {body}")]
    RemoteRequest { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Ongeldige JSON van Floriday: {0}")]
    Json(#[from] serde_json::Error),
}
