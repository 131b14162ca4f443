// Library root
// -----------
// Floriday magic wand: strip the background from product images and publish
// them to the Floriday media library.
//
// Module responsibilities:
// - `config`: Floriday API settings read from the environment.
// - `api`: blocking client for the media endpoint (upload, list).
// - `multipart`: hand-built multipart/form-data bodies.
// - `magic_wand`: background removal behind the `BackgroundRemover` trait.
// - `cli`: the one-shot command-line pipeline.
// - `ui`: interactive terminal menu.
// - `web` / `page`: the browser UI server and its HTML page.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod magic_wand;
pub mod multipart;
pub mod page;
pub mod ui;
pub mod web;

pub use api::{FloridayClient, MediaItem};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use magic_wand::{remove_background, BackgroundRemover, RembgCommand};
