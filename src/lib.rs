// Crate root library declaration and module exports.
pub mod archive;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod locale;
pub mod model;
pub mod selection;
