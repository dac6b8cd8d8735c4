//! Comment classification and localized response templates.
//!
//! A `Languages` list classifies a command into an `Intent` using the first
//! language that understands it; every language also supplies the reply
//! templates addressed by `ResponseKey`.

pub mod error;
pub mod intent;
pub mod language;
pub mod language_file;
pub mod pattern_language;
pub mod response;

pub use error::LanguageError;
pub use intent::Intent;
pub use language::{CommandCategory, Language, Languages};
pub use language_file::{load_languages_file, parse_languages};
pub use pattern_language::{IntentRule, PatternLanguage};
pub use response::{render_template, ResponseKey};
