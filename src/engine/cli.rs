//! CLI command handler: uppercase INPUT into OUTPUT, or generate a sample input.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::Cli;
use crate::engine::progress::CliObserver;
use crate::pipeline::{RunObserver, transform_file};
use crate::{Opts, RunSummary};
use crate::utils::{
    apply_file_to_opts, discard_temp, load_capsflow_toml, remove_stale_temp,
    rename_temp_to_final, setup_logging, temp_path_for, write_sample_input_mib,
};

/// Defaults, then `.capsflow.toml` in the working directory, then flags. Sets up logging.
fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts::default();
    let file = load_capsflow_toml(Path::new("."));
    if let Ok(Some(ref f)) = file {
        apply_file_to_opts(f, &mut opts);
    }
    cli.apply_to_opts(&mut opts);
    setup_logging(opts.verbose);
    if let Err(e) = file {
        warn!("ignoring config file: {:#}", e);
    }
    opts
}

fn install_cancel_handler() -> Result<Arc<AtomicBool>> {
    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;
    Ok(cancel_requested)
}

/// Uppercase `opts.input` into `opts.output`. With `opts.atomic` the run writes a temp file
/// next to the output and renames it on success; on failure the temp is removed and an
/// existing output is left as it was.
pub fn run_transform<O>(
    opts: &Opts,
    observer: &mut O,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<RunSummary>
where
    O: RunObserver + ?Sized,
{
    let temp: Option<PathBuf> = if opts.atomic {
        let t = temp_path_for(&opts.output);
        remove_stale_temp(&t)?;
        Some(t)
    } else {
        None
    };
    let work_path = temp.as_deref().unwrap_or(&opts.output);

    info!(
        "Transforming {} -> {}",
        opts.input.display(),
        opts.output.display()
    );
    match transform_file(&opts.input, work_path, observer, cancel) {
        Ok(summary) => {
            if let Some(ref t) = temp {
                rename_temp_to_final(t, &opts.output)?;
            }
            Ok(summary)
        }
        Err(e) => {
            if let Some(ref t) = temp {
                discard_temp(t);
            }
            Err(anyhow::Error::new(e)
                .context(format!("uppercase {}", opts.input.display())))
        }
    }
}

/// Run the transform (default) or write a sample input when `--generate-mib` is given.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    if let Some(mib) = opts.generate_mib {
        write_sample_input_mib(&opts.input, mib)?;
        return Ok(());
    }

    let cancel = install_cancel_handler()?;
    let mut observer = CliObserver::new(opts.verbose);
    let result = run_transform(&opts, &mut observer, Some(cancel));
    observer.close_bar();
    let summary = result?;

    if opts.json {
        println!(
            "{}",
            serde_json::to_string(&summary).context("serialize run summary")?
        );
    }
    Ok(())
}
