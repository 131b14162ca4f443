// Interactive menu: the same magic wand pipeline driven by `dialoguer`
// prompts, plus a quick look at the media library.

use crate::api::FloridayClient;
use crate::cli::run_pipeline;
use crate::config::ClientConfig;
use crate::magic_wand::BackgroundRemover;
use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Run a select loop until the user chooses "Afsluiten". Failed actions are
/// reported and the menu comes back.
pub fn main_menu(remover: &dyn BackgroundRemover, output_dir: &Path) -> Result<()> {
    let items = ["Vrijstaand maken + uploaden", "Beeldbank bekijken", "Afsluiten"];
    loop {
        let selection = Select::new().items(&items).default(0).interact()?;
        let outcome = match selection {
            0 => handle_magic_wand(remover, output_dir),
            1 => handle_list_media(),
            _ => break,
        };
        if let Err(e) = outcome {
            println!("Mislukt: {e}");
        }
    }
    Ok(())
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Ask for an image, an optional title and whether to upload, then run the
/// pipeline behind a spinner.
fn handle_magic_wand(remover: &dyn BackgroundRemover, output_dir: &Path) -> Result<()> {
    let path: String = Input::new().with_prompt("Pad naar afbeelding").interact_text()?;
    let title: String = Input::new()
        .with_prompt("Titel (optioneel)")
        .allow_empty(true)
        .interact_text()?;
    let upload = Confirm::new()
        .with_prompt("Uploaden naar Floriday?")
        .default(true)
        .interact()?;

    let source = PathBuf::from(path.trim());
    let title = Some(title.trim()).filter(|t| !t.is_empty());

    let progress = spinner("Bezig met vrijstaand maken...")?;
    let mut report = Vec::new();
    let result = run_pipeline(
        &source,
        output_dir,
        title,
        !upload,
        remover,
        ClientConfig::from_env,
        &mut report,
    );
    progress.finish_and_clear();

    print!("{}", String::from_utf8_lossy(&report));
    result?;
    Ok(())
}

/// Print one line per media item: its title (or name) and id.
fn handle_list_media() -> Result<()> {
    let client = FloridayClient::new(ClientConfig::from_env()?)?;
    let progress = spinner("Beeldbank laden...")?;
    let items = client.list_media();
    progress.finish_and_clear();

    let items = items?;
    if items.is_empty() {
        println!("Geen media gevonden.");
        return Ok(());
    }
    for item in &items {
        let label = item
            .get("title")
            .or_else(|| item.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or("Zonder titel");
        match item.get("id") {
            Some(id) => println!("- {label} ({id})"),
            None => println!("- {label}"),
        }
    }
    Ok(())
}
