//! Configuration module for soli
//!
//! soli has no settings file; configuration is the location of the key
//! record, resolved from the environment.

pub mod paths;

pub use paths::SoliPaths;
