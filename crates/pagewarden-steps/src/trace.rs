use pagewarden_github::RepoRef;

use crate::check::Check;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `TraceEntry` values.
pub enum TraceEntry {
    Reply { text: String },
    Check { check: Check, passed: bool },
    IndexSite { site_url: String, index_name: String },
    IndexPage { page_url: String, index_name: String },
    StarRepo { repo: RepoRef },
    Final { note: Option<String>, failed: bool },
}

impl TraceEntry {
    pub fn label(&self) -> String {
        match self {
            Self::Reply { .. } => "reply".to_string(),
            Self::Check { check, passed } => format!("{}={passed}", check.as_str()),
            Self::IndexSite { .. } => "index_site".to_string(),
            Self::IndexPage { .. } => "index_page".to_string(),
            Self::StarRepo { .. } => "star_repo".to_string(),
            Self::Final { .. } => "final".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Nodes a graph run completed, in order.
pub struct StepTrace {
    entries: Vec<TraceEntry>,
}

impl StepTrace {
    pub fn new(entries: Vec<TraceEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(TraceEntry::label).collect()
    }

    pub fn replies(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                TraceEntry::Reply { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn indexed(&self) -> bool {
        self.entries.iter().any(|entry| {
            matches!(
                entry,
                TraceEntry::IndexSite { .. } | TraceEntry::IndexPage { .. }
            )
        })
    }

    pub fn final_note(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|entry| match entry {
            TraceEntry::Final { note, .. } => note.as_deref(),
            _ => None,
        })
    }
}
