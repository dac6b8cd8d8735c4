use pagewarden_github::Command;
use pagewarden_language::{Intent, Language, Languages, ResponseKey};
use pagewarden_steps::{
    LogsLocation, StepContext, StepGraph, StepGraphBuilder, StepGraphError, Steps, StepsOutcome,
};
use tracing::{info, info_span};

use crate::index_graph::{build_index_graph, IndexKind};

pub const DENIAL_NOTE: &str = "Action finished successfully after command denial.";
pub const FALLBACK_NOTE: &str = "[ERROR] Some step didn't execute properly.";
pub const UNSUPPORTED_NOTE: &str = "delete index is not supported yet";

#[derive(Debug, Clone)]
/// Understands commands and assembles the steps that fulfil them.
pub struct Brain {
    languages: Languages,
}

impl Brain {
    pub fn new(languages: Languages) -> Self {
        Self { languages }
    }

    pub fn languages(&self) -> &Languages {
        &self.languages
    }

    /// Classifies the command and builds its primary graph together with
    /// the fixed failure fallback.
    pub fn understand(
        &self,
        command: &Command,
        logs: &LogsLocation,
    ) -> Result<Steps, StepGraphError> {
        let author = command.author_login();
        info!(author, "understanding command");
        let category = self.languages.categorize(command);
        let language = category.language();

        let primary = match category.intent() {
            Intent::Hello => reply_graph(language.render(ResponseKey::Hello, &[author]), None)?,
            Intent::IndexSite => build_index_graph(command, language, logs, IndexKind::Site)?,
            Intent::IndexPage => build_index_graph(command, language, logs, IndexKind::Page)?,
            Intent::DeleteIndex => reply_graph(
                language.render(ResponseKey::DeleteIndexUnsupported, &[author]),
                Some(UNSUPPORTED_NOTE),
            )?,
            Intent::Unknown => {
                info!(author, "unknown command");
                reply_graph(language.render(ResponseKey::Unknown, &[author]), None)?
            }
        };
        Ok(Steps::new(primary, fallback_graph(command, language, logs)?))
    }

    /// Understands and performs one command.
    pub fn handle(
        &self,
        command: &Command,
        ctx: &StepContext<'_>,
    ) -> Result<StepsOutcome, StepGraphError> {
        let span = info_span!(
            "command",
            author = command.author_login(),
            issue = %command.issue()
        );
        let _guard = span.enter();
        let steps = self.understand(command, ctx.logs)?;
        Ok(steps.perform(command, ctx))
    }
}

fn reply_graph(text: String, note: Option<&str>) -> Result<StepGraph, StepGraphError> {
    let mut builder = StepGraphBuilder::new();
    let done = builder.final_step(note)?;
    let reply = builder.reply(text, done)?;
    builder.build(reply)
}

fn fallback_graph(
    command: &Command,
    language: &dyn Language,
    logs: &LogsLocation,
) -> Result<StepGraph, StepGraphError> {
    let mut builder = StepGraphBuilder::new();
    let done = builder.failed_final_step(FALLBACK_NOTE)?;
    let text = language.render(
        ResponseKey::StepFailure,
        &[command.author_login(), logs.address()],
    );
    let reply = builder.reply(text, done)?;
    builder.build(reply)
}
