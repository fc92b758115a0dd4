use std::{path::PathBuf, sync::mpsc::channel, time::Duration};

use licensing_lib::{CacheableLicensingBlock, LicensingError, LicensingErrorKind};
use notify_debouncer_full::{
    DebouncedEvent, new_debouncer,
    notify::{EventKind, RecursiveMode},
};

use crate::{Args, run};

/// Render again whenever the config, page or locale file changes. The same block is reused so
/// unchanged inputs come from its cache.
pub fn watch_and_rerender(
    args: &Args,
    mut block: CacheableLicensingBlock,
) -> Result<(), LicensingError> {
    let mut inputs = vec![args.config.clone(), args.page.clone()];
    if let Some(locale) = &args.locale {
        inputs.push(locale.clone());
    }
    let files = inputs
        .iter()
        .map(|path| path.canonicalize())
        .collect::<Result<Vec<PathBuf>, _>>()?;

    // editors often replace files, watch the directories they live in
    let mut directories: Vec<PathBuf> = files
        .iter()
        .filter_map(|file| file.parent().map(|p| p.to_path_buf()))
        .collect();
    directories.sort();
    directories.dedup();

    let (tx, rx) = channel();
    let watched = files.clone();
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        None,
        move |result: Result<Vec<DebouncedEvent>, _>| {
            if let Ok(events) = result {
                let changed: Vec<&DebouncedEvent> = events
                    .iter()
                    // file reads are not modifications
                    .filter(|event| !matches!(event.event.kind, EventKind::Access(_)))
                    .filter(|event| event.event.paths.iter().any(|p| watched.contains(p)))
                    .collect();

                if !changed.is_empty() {
                    for event in changed {
                        log::debug!("File change detected: {:?}", event);
                    }
                    if tx.send(()).is_err() {
                        log::warn!("Watcher stopped, ignoring change");
                    }
                }
            }
        },
    )
    .map_err(|e| LicensingError::new(e.to_string(), LicensingErrorKind::Io))?;

    for directory in &directories {
        debouncer
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| {
                LicensingError::new(e.to_string(), LicensingErrorKind::Io)
                    .with_context(directory.display().to_string())
            })?;
    }

    if let (Some(port), Some(output)) = (args.port, &args.output) {
        log::info!("Preview server at http://localhost:{}", port);
        log::info!("Serving {:?}", output);
    }
    log::info!("Watching {:?} for changes", files);
    log::info!("Press Ctrl+C to stop.");

    for _ in rx {
        log::info!("Changes detected, rendering again...");
        match run(args, &mut block) {
            Ok(_) => log::info!(
                "Render completed ({} cache hit(s), {} miss(es))",
                block.cache().hits(),
                block.cache().misses()
            ),
            Err(e) => log::error!("Render failed: {}", e),
        }
    }

    Ok(())
}
