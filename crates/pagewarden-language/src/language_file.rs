//! TOML description of the configured languages.
//!
//! ```toml
//! [[languages]]
//! name = "romanian"
//!
//! [[languages.rules]]
//! intent = "hello"
//! patterns = ["\\bsalut\\b"]
//!
//! [languages.responses]
//! "hello.comment" = "Salut @{0}!"
//! ```
//!
//! Languages keep file order, which is classification priority. Response keys
//! a language leaves out fall back to the built-in English templates.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::error::LanguageError;
use crate::intent::Intent;
use crate::language::{Language, Languages};
use crate::pattern_language::{english_responses, PatternLanguage};
use crate::response::ResponseKey;

#[derive(Debug, Deserialize)]
struct LanguagesFile {
    #[serde(default)]
    languages: Vec<LanguageEntry>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    name: String,
    #[serde(default)]
    rules: Vec<RuleEntry>,
    #[serde(default)]
    responses: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    intent: Intent,
    patterns: Vec<String>,
}

pub fn parse_languages(raw: &str, origin: &str) -> Result<Languages, LanguageError> {
    let file: LanguagesFile = toml::from_str(raw).map_err(|error| LanguageError::File {
        path: origin.to_string(),
        message: error.to_string(),
    })?;
    let mut languages: Vec<Arc<dyn Language>> = Vec::with_capacity(file.languages.len());
    for entry in file.languages {
        let mut responses = english_responses();
        for (key, template) in entry.responses {
            responses.insert(key.parse::<ResponseKey>()?, template);
        }
        let rules = entry
            .rules
            .into_iter()
            .map(|rule| (rule.intent, rule.patterns))
            .collect();
        languages.push(Arc::new(PatternLanguage::new(entry.name, rules, responses)?));
    }
    Languages::new(languages)
}

pub fn load_languages_file(path: &Path) -> Result<Languages, LanguageError> {
    let origin = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|error| LanguageError::File {
        path: origin.clone(),
        message: error.to_string(),
    })?;
    let languages = parse_languages(&raw, &origin)?;
    info!(path = %origin, count = languages.iter().count(), "languages loaded");
    Ok(languages)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{load_languages_file, parse_languages};
    use crate::response::ResponseKey;
    use crate::LanguageError;

    const TWO_LANGUAGES: &str = r#"
[[languages]]
name = "romanian"

[[languages.rules]]
intent = "hello"
patterns = ["\\bsalut\\b"]

[[languages.rules]]
intent = "indexsite"
patterns = ["\\bindexeaza\\b.*\\bsite\\b"]

[languages.responses]
"hello.comment" = "Salut @{0}!"

[[languages]]
name = "english"

[[languages.rules]]
intent = "hello"
patterns = ["\\bhello\\b"]
"#;

    #[test]
    fn functional_parse_languages_keeps_file_order_and_overrides() {
        let languages = parse_languages(TWO_LANGUAGES, "inline").expect("parse");
        let names = languages.iter().map(|l| l.name().to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["romanian", "english"]);
        let romanian = languages.primary();
        assert_eq!(romanian.render(ResponseKey::Hello, &["ana"]), "Salut @ana!");
        assert!(romanian
            .response(ResponseKey::DeniedFork)
            .contains("forked repositories"));
    }

    #[test]
    fn regression_parse_languages_rejects_unknown_keys_and_empty_files() {
        let unknown = parse_languages(
            "[[languages]]\nname = \"x\"\n[languages.responses]\n\"bogus.comment\" = \"hi\"\n",
            "inline",
        )
        .expect_err("unknown key");
        assert!(matches!(unknown, LanguageError::UnknownResponseKey(_)));

        let empty = parse_languages("", "inline").expect_err("empty");
        assert!(matches!(empty, LanguageError::NoLanguages));

        let bad_intent = parse_languages(
            "[[languages]]\nname = \"x\"\n[[languages.rules]]\nintent = \"shout\"\npatterns = []\n",
            "inline",
        )
        .expect_err("bad intent");
        assert!(matches!(bad_intent, LanguageError::File { .. }));
    }

    #[test]
    fn integration_load_languages_file_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("languages.toml");
        fs::write(&path, TWO_LANGUAGES).expect("write");
        let languages = load_languages_file(&path).expect("load");
        assert_eq!(languages.iter().count(), 2);
        assert_eq!(languages.primary().name(), "romanian");

        let missing = load_languages_file(&dir.path().join("absent.toml")).expect_err("missing");
        assert!(matches!(missing, LanguageError::File { .. }));
    }
}
