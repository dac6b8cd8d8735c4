use std::fmt;
use std::sync::Arc;

use pagewarden_github::Command;
use tracing::info;

use crate::error::LanguageError;
use crate::intent::Intent;
use crate::response::{render_template, ResponseKey};

/// A spoken language the agent understands and replies in.
pub trait Language: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Returns the intent when this language understands the command.
    fn categorize(&self, command: &Command) -> Option<Intent>;

    fn response(&self, key: ResponseKey) -> &str;

    fn render(&self, key: ResponseKey, args: &[&str]) -> String {
        render_template(self.response(key), args)
    }
}

#[derive(Debug, Clone)]
/// Result of classifying one command.
pub struct CommandCategory {
    intent: Intent,
    language: Arc<dyn Language>,
    understood: bool,
}

impl CommandCategory {
    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn language(&self) -> &dyn Language {
        self.language.as_ref()
    }

    pub fn is_understood(&self) -> bool {
        self.understood
    }
}

#[derive(Debug, Clone)]
/// Non-empty list of languages in classification priority order.
pub struct Languages {
    languages: Vec<Arc<dyn Language>>,
}

impl Languages {
    pub fn new(languages: Vec<Arc<dyn Language>>) -> Result<Self, LanguageError> {
        if languages.is_empty() {
            return Err(LanguageError::NoLanguages);
        }
        Ok(Self { languages })
    }

    pub fn primary(&self) -> &dyn Language {
        self.languages[0].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Language> {
        self.languages.iter().map(|language| language.as_ref())
    }

    /// First language that understands the command wins; when none does the
    /// category is `Unknown` in the first configured language.
    pub fn categorize(&self, command: &Command) -> CommandCategory {
        for language in &self.languages {
            if let Some(intent) = language.categorize(command) {
                info!(
                    intent = intent.as_str(),
                    language = language.name(),
                    "command categorized"
                );
                return CommandCategory {
                    intent,
                    language: Arc::clone(language),
                    understood: true,
                };
            }
        }
        info!(author = command.author_login(), "command not understood");
        CommandCategory {
            intent: Intent::Unknown,
            language: Arc::clone(&self.languages[0]),
            understood: false,
        }
    }
}
