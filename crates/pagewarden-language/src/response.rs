use std::fmt;
use std::str::FromStr;

use crate::error::LanguageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Keys of the reply templates every language must provide.
pub enum ResponseKey {
    Hello,
    Unknown,
    StepFailure,
    DeniedFork,
    DeniedBadLink,
    DeniedCommander,
    DeniedName,
    IndexStart,
    IndexFinished,
    DeleteIndexUnsupported,
}

impl ResponseKey {
    pub const ALL: [ResponseKey; 10] = [
        Self::Hello,
        Self::Unknown,
        Self::StepFailure,
        Self::DeniedFork,
        Self::DeniedBadLink,
        Self::DeniedCommander,
        Self::DeniedName,
        Self::IndexStart,
        Self::IndexFinished,
        Self::DeleteIndexUnsupported,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hello => "hello.comment",
            Self::Unknown => "unknown.comment",
            Self::StepFailure => "step.failure.comment",
            Self::DeniedFork => "denied.fork.comment",
            Self::DeniedBadLink => "denied.badlink.comment",
            Self::DeniedCommander => "denied.commander.comment",
            Self::DeniedName => "denied.name.comment",
            Self::IndexStart => "index.start.comment",
            Self::IndexFinished => "index.finished.comment",
            Self::DeleteIndexUnsupported => "deleteindex.unsupported.comment",
        }
    }
}

impl fmt::Display for ResponseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseKey {
    type Err = LanguageError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == trimmed)
            .ok_or_else(|| LanguageError::UnknownResponseKey(trimmed.to_string()))
    }
}

/// Substitutes `{0}`, `{1}`, ... with positional arguments.
///
/// Placeholders without a matching argument are left untouched.
pub fn render_template(template: &str, args: &[&str]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after
            .find('}')
            .map(|close| (close, &after[..close]))
            .filter(|(_, digits)| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|(close, digits)| {
                digits
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| args.get(index))
                    .map(|arg| (close, *arg))
            });
        match placeholder {
            Some((close, arg)) => {
                rendered.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                rendered.push('{');
                rest = after;
            }
        }
    }
    rendered.push_str(rest);
    rendered
}
