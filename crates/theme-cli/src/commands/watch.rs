//! Watch command implementation
//!
//! Bridges `notify` events to `SyncEngine::on_files_changed`. Events that
//! arrive within the debounce window are coalesced into one batch; the
//! engine's cooldown then drops the events caused by its own writes.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use colored::Colorize;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use theme_core::SyncOptions;

use crate::commands::report::print_report;
use crate::context::ThemeContext;
use crate::error::Result;

/// Run the watch command until the watcher shuts down
pub fn run_watch(context: &ThemeContext, debounce: Duration) -> Result<()> {
    let mut engine = context.engine(SyncOptions::default())?;

    let report = engine.build_start();
    print_report(&report, context);

    let dirs = [
        engine.config().schema_dir.clone(),
        engine.config().sections_dir.clone(),
    ];

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)?;
    for dir in &dirs {
        watcher.watch(dir.as_ref(), RecursiveMode::NonRecursive)?;
    }

    println!(
        "{} Watching {} and {} (Ctrl+C to stop)",
        "=>".blue().bold(),
        context.display_path(dirs[0].as_str()).cyan(),
        context.display_path(dirs[1].as_str()).cyan()
    );

    while let Some(paths) = next_batch(&rx, debounce) {
        if paths.is_empty() {
            continue;
        }
        let report = engine.on_files_changed(&paths);
        if report.throttled {
            tracing::debug!(?paths, "Changes ignored during cooldown");
        } else if !report.sections.is_empty() || !report.errors.is_empty() {
            print_report(&report, context);
        }
    }

    tracing::info!("File watcher stopped");
    Ok(())
}

/// Block for the next event, then collect everything that arrives within
/// `debounce`. Returns `None` once the watcher has gone away.
fn next_batch(rx: &Receiver<notify::Result<Event>>, debounce: Duration) -> Option<Vec<PathBuf>> {
    let mut paths = BTreeSet::new();
    collect(rx.recv().ok()?, &mut paths);

    let deadline = Instant::now() + debounce;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(event) => collect(event, &mut paths),
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Some(paths.into_iter().collect())
}

fn collect(event: notify::Result<Event>, paths: &mut BTreeSet<PathBuf>) {
    match event {
        Ok(event) if is_content_change(&event.kind) => paths.extend(event.paths),
        Ok(_) => {}
        Err(e) => tracing::warn!("File watcher error: {}", e),
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}
