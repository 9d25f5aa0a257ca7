//! `canon-config` — Settings for the library tools.

pub mod settings;

pub use settings::Settings;
