use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Enumerates supported `Intent` values.
pub enum Intent {
    Hello,
    IndexSite,
    IndexPage,
    DeleteIndex,
    Unknown,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::IndexSite => "indexsite",
            Self::IndexPage => "indexpage",
            Self::DeleteIndex => "deleteindex",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
