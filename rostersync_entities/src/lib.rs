//! Database entities for the roster and the site settings.

pub mod roster;
pub mod settings;
