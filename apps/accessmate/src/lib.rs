//! AccessMate core library.
//!
//! This crate scans HTML documents for common accessibility defects,
//! scores them, remediates them in place, and remaps colours for
//! colour-vision deficiencies.
//!
//! High-level modules:
//! - `dom`, `style`, `color`: document handle, inline style cascade, colour maths.
//! - `rules`: one evaluator and one remediator per issue category.
//! - `scan`: runs evaluators and folds findings into a `ScanReport`.
//! - `fix`: remediation by category or all at once.
//! - `filters`: protanopia/deuteranopia/tritanopia colour remapping.
//! - `media`: autoplay suppression for media elements and player embeds.
//! - `messaging`: popup/content-script request contract.
//! - `settings`: persisted user settings.
//! - `cli`, `config`, `run`, `output`: command-line surface.
//! - `models`, `error`, `utils`: shared types and helpers.
pub mod cli;
pub mod color;
pub mod config;
pub mod dom;
pub mod error;
pub mod filters;
pub mod fix;
pub mod media;
pub mod messaging;
pub mod models;
pub mod output;
pub mod rules;
pub mod run;
pub mod scan;
pub mod settings;
pub mod style;
pub mod utils;
