//! Logger setup
//!
//! stdout is the drawing surface, so logs go to stderr or to a file.

use anyhow::Context;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::File;
use std::path::Path;

/// Most verbose level allowed for this logging target.
///
/// stderr shares the terminal with the diff writer while the interactive
/// view is up, and anything printed there lands on cells the frame still
/// believes are drawn. Only rare warnings and errors may go there.
pub fn level_cap(log_to_file: bool, interactive: bool) -> LevelFilter {
    if interactive && !log_to_file {
        LevelFilter::Warn
    } else {
        LevelFilter::Trace
    }
}

/// Initialise env_logger; `RUST_LOG` overrides `level`, within [`level_cap`].
pub fn init_logger(
    level: LevelFilter,
    log_file: Option<&Path>,
    interactive: bool,
) -> anyhow::Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(level).parse_default_env();

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder.try_init().context("Failed to initialise logger")?;

    let cap = level_cap(log_file.is_some(), interactive);
    if log::max_level() > cap {
        log::set_max_level(cap);
        log::warn!("Interactive mode logs at most '{}' to stderr; pass --log-file for more", cap);
    }
    Ok(())
}
