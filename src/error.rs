use flexi_logger::FlexiLoggerError;
use std::io;
use thiserror::Error;

use crate::library::CatalogError;

/// Failures that end the program before or outside the event loop.
#[derive(Error, Debug)]
pub enum App {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Logger initialization error: {0}")]
    Logger(#[from] FlexiLoggerError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("no catalog given: pass a manifest or directory, or set library.source")]
    NoCatalogSource,
}
