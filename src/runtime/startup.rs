use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use log::{info, warn};

use crate::config::{self, LibrarySettings, LoggingSettings};
use crate::error::App;
use crate::library::{Catalog, DirectoryCatalog, ManifestCatalog};
use crate::player::{Command, Controller, Transport};

/// Start the file logger. The returned handle must outlive the program.
pub fn start_logger(settings: &LoggingSettings) -> Result<LoggerHandle, App> {
    let dir = log_dir(settings);
    fs::create_dir_all(&dir)?;

    let handle = Logger::try_with_str(&settings.level)?
        .log_to_file(FileSpec::default().directory(&dir))
        .rotate(
            Criterion::Size(1_000_000),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(3),
        )
        .duplicate_to_stderr(Duplicate::None)
        .start()?;
    Ok(handle)
}

pub fn log_dir(settings: &LoggingSettings) -> PathBuf {
    settings
        .directory
        .clone()
        .or_else(config::default_log_dir)
        .unwrap_or_else(|| env::temp_dir().join("melodeck").join("logs"))
}

/// The command-line argument wins over `library.source`.
pub fn resolve_source(arg: Option<String>, settings: &LibrarySettings) -> Result<PathBuf, App> {
    arg.map(PathBuf::from)
        .or_else(|| settings.source.clone())
        .ok_or(App::NoCatalogSource)
}

/// A directory is scanned for audio files; anything else is read as a manifest.
pub fn open_catalog(source: &Path, settings: &LibrarySettings) -> Result<Box<dyn Catalog>, App> {
    let catalog: Box<dyn Catalog> = if source.is_dir() {
        Box::new(DirectoryCatalog::scan(source, settings)?)
    } else {
        Box::new(ManifestCatalog::load(source)?)
    };
    info!(
        "Catalog {} opened with {} tracks",
        source.display(),
        catalog.tracks().len()
    );
    Ok(catalog)
}

pub fn apply_playback_defaults<T: Transport>(
    controller: &mut Controller<T>,
    settings: &config::Settings,
) {
    if let Err(e) = controller.execute(Command::SetVolume(settings.audio.initial_volume)) {
        warn!("Could not apply initial volume: {e}");
    }
}
