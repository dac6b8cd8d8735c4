use std::collections::BTreeMap;

use pagewarden_github::Command;
use regex::{Regex, RegexBuilder};

use crate::error::LanguageError;
use crate::intent::Intent;
use crate::language::Language;
use crate::response::ResponseKey;

const ENGLISH_RULES: &[(Intent, &[&str])] = &[
    (Intent::DeleteIndex, &[r"\b(delete|remove|drop)\b.*\bindex\b"]),
    (Intent::IndexPage, &[r"\bindex\b.*\bpage\b"]),
    (Intent::IndexSite, &[r"\bindex\b.*\b(site|website)\b"]),
    (Intent::Hello, &[r"\b(hello|hi|hey)\b"]),
];

const ENGLISH_RESPONSES: &[(ResponseKey, &str)] = &[
    (
        ResponseKey::Hello,
        "Hi @{0}! I can index your GitHub Pages website. Mention me and say `index site`, or `index page (link)` for a single page.",
    ),
    (
        ResponseKey::Unknown,
        "@{0} I'm sorry, I don't understand that. Mention me with `hello` to see what I can do.",
    ),
    (
        ResponseKey::StepFailure,
        "@{0} Something went wrong while handling your command. The logs are available at {1}.",
    ),
    (
        ResponseKey::DeniedFork,
        "@{0} I don't index forked repositories.",
    ),
    (
        ResponseKey::DeniedBadLink,
        "@{0} The page you gave me is not part of this repository's GitHub Pages website.",
    ),
    (
        ResponseKey::DeniedCommander,
        "@{0} Only the repository owner or an organization admin can ask me to index this website.",
    ),
    (
        ResponseKey::DeniedName,
        "@{0} This repository does not host a GitHub Pages website: it is not named `owner.github.io` and has no `gh-pages` branch.",
    ),
    (
        ResponseKey::IndexStart,
        "@{0} Indexing started. You can follow the progress at {1}.",
    ),
    (
        ResponseKey::IndexFinished,
        "@{0} I finished indexing {1}. The logs are available at {2}.",
    ),
    (
        ResponseKey::DeleteIndexUnsupported,
        "@{0} Deleting an index is not supported yet.",
    ),
];

#[derive(Debug, Clone)]
/// Ordered regex alternatives that map text to one intent.
pub struct IntentRule {
    intent: Intent,
    patterns: Vec<Regex>,
}

impl IntentRule {
    pub fn intent(&self) -> Intent {
        self.intent
    }

    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }
}

#[derive(Debug, Clone)]
/// Language driven by case-insensitive regex rules and a template table.
pub struct PatternLanguage {
    name: String,
    rules: Vec<IntentRule>,
    responses: BTreeMap<ResponseKey, String>,
}

impl PatternLanguage {
    /// Rules are tried in order. `responses` must cover every [`ResponseKey`].
    pub fn new(
        name: impl Into<String>,
        rules: Vec<(Intent, Vec<String>)>,
        responses: BTreeMap<ResponseKey, String>,
    ) -> Result<Self, LanguageError> {
        let name = name.into();
        let mut compiled = Vec::with_capacity(rules.len());
        for (intent, patterns) in rules {
            let mut regexes = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let regex = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|error| LanguageError::InvalidPattern {
                        language: name.clone(),
                        pattern: pattern.clone(),
                        message: error.to_string(),
                    })?;
                regexes.push(regex);
            }
            compiled.push(IntentRule {
                intent,
                patterns: regexes,
            });
        }
        if let Some(key) = ResponseKey::ALL
            .into_iter()
            .find(|key| !responses.contains_key(key))
        {
            return Err(LanguageError::MissingResponse {
                language: name,
                key,
            });
        }
        Ok(Self {
            name,
            rules: compiled,
            responses,
        })
    }

    pub fn english() -> Result<Self, LanguageError> {
        let rules = ENGLISH_RULES
            .iter()
            .map(|(intent, patterns)| {
                (
                    *intent,
                    patterns.iter().map(|pattern| pattern.to_string()).collect(),
                )
            })
            .collect();
        Self::new("english", rules, english_responses())
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn classify_text(&self, text: &str) -> Option<Intent> {
        let text = command_text(text);
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map(IntentRule::intent)
    }
}

impl Language for PatternLanguage {
    fn name(&self) -> &str {
        &self.name
    }

    fn categorize(&self, command: &Command) -> Option<Intent> {
        self.classify_text(command.body())
    }

    fn response(&self, key: ResponseKey) -> &str {
        self.responses
            .get(&key)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

pub(crate) fn english_responses() -> BTreeMap<ResponseKey, String> {
    ENGLISH_RESPONSES
        .iter()
        .map(|(key, template)| (*key, template.to_string()))
        .collect()
}

/// Drops a leading `@mention` and anything from the first `(` on, so links
/// never take part in classification.
fn command_text(body: &str) -> &str {
    let mut text = body.trim();
    if text.starts_with('@') {
        text = text
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim_start())
            .unwrap_or_default();
    }
    match text.find('(') {
        Some(index) => &text[..index],
        None => text,
    }
}
