// Entrypoint for the command-line magic wand.
// - `--interactive` hands over to the menu in `ui`.
// - Otherwise one image is processed and, unless `--dry-run`, uploaded.
// - Errors bubble up through `anyhow`, giving a message and a non-zero exit.

use anyhow::Context;
use clap::Parser;
use floriday_magic_wand::cli::{run_pipeline, CliArgs};
use floriday_magic_wand::{logging, ui, ClientConfig, RembgCommand};

fn main() -> anyhow::Result<()> {
    logging::init("warn");
    let args = CliArgs::parse();
    let remover = RembgCommand::from_env();

    if args.interactive {
        return ui::main_menu(&remover, &args.output_dir);
    }

    let source = args
        .input_image
        .as_deref()
        .context("Geen bronafbeelding opgegeven")?;
    let mut stdout = std::io::stdout().lock();
    run_pipeline(
        source,
        &args.output_dir,
        args.title.as_deref(),
        args.dry_run,
        &remover,
        ClientConfig::from_env,
        &mut stdout,
    )?;
    Ok(())
}
