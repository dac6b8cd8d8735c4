use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use pagewarden_brain::Brain;
use pagewarden_github::{
    Command, GithubApiClient, GithubApiClientConfig, GithubPlatform, IssueCommentEvent,
};
use pagewarden_language::{
    load_languages_file, Language, Languages, PatternLanguage, ResponseKey,
};
use pagewarden_steps::{Indexer, LogsLocation, StepContext, StepsOutcome, TracingIndexer};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::cli_args::Cli;
use crate::webhook_indexer::WebhookIndexer;

pub(crate) fn run(cli: &Cli) -> Result<()> {
    let languages = load_languages(cli.languages_file.as_deref())?;
    let github = GithubApiClient::new(&GithubApiClientConfig {
        api_base: cli.github_api_base.clone(),
        token: cli.github_token.clone(),
        request_timeout_ms: cli.request_timeout_ms,
    })
    .context("failed to create github client")?;
    let indexer: Box<dyn Indexer> = match cli.index_endpoint.as_deref() {
        Some(endpoint) => Box::new(WebhookIndexer::new(endpoint, cli.request_timeout_ms)?),
        None => {
            warn!("no index endpoint configured, index requests will only be logged");
            Box::new(TracingIndexer)
        }
    };
    let logs = LogsLocation::new(cli.logs_address.clone());
    let event = read_event(&cli.event_file)?;
    let ctx = StepContext::new(&github, indexer.as_ref(), &logs);

    let brain = Brain::new(languages);
    match handle_event(&brain, &event, cli.bot_login.as_deref(), &ctx)? {
        None | Some(StepsOutcome::Completed { .. }) => Ok(()),
        Some(StepsOutcome::FallbackCompleted { error, .. }) => {
            bail!("command for {} failed: {error}", event.issue)
        }
    }
}

pub(crate) fn load_languages(path: Option<&Path>) -> Result<Languages> {
    match path {
        Some(path) => load_languages_file(path)
            .with_context(|| format!("failed to load languages from {}", path.display())),
        None => {
            let english = PatternLanguage::english().context("invalid built-in language")?;
            Ok(Languages::new(vec![Arc::new(english) as Arc<dyn Language>])?)
        }
    }
}

pub(crate) fn read_event(path: &Path) -> Result<IssueCommentEvent> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read event file {}", path.display()))?;
    let payload: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse event file {}", path.display()))?;
    Ok(IssueCommentEvent::from_payload(&payload)?)
}

/// Returns `None` when the event carries no command for the agent: an edit or
/// deletion, the agent's own comment, or a comment that does not open with
/// `@<bot_login>`.
pub(crate) fn handle_event(
    brain: &Brain,
    event: &IssueCommentEvent,
    bot_login: Option<&str>,
    ctx: &StepContext<'_>,
) -> Result<Option<StepsOutcome>> {
    if !event.is_created() {
        info!(issue = %event.issue, action = %event.action, "ignoring comment event");
        return Ok(None);
    }
    let author = event.comment.user.login.as_str();
    if let Some(bot) = bot_login {
        if bot.eq_ignore_ascii_case(author) {
            info!(issue = %event.issue, "ignoring own comment");
            return Ok(None);
        }
        let body = event.comment.body.as_deref().unwrap_or_default();
        if !addressed_to(body, bot) {
            info!(
                issue = %event.issue,
                author,
                bot_login = bot,
                "ignoring comment not addressed to the agent"
            );
            return Ok(None);
        }
    }

    let command = match Command::load(ctx.github, event) {
        Ok(command) => command,
        Err(load_error) => {
            error!(error = %load_error, issue = %event.issue, "failed to load command context");
            report_load_failure(brain, event, ctx.github, ctx.logs);
            return Err(load_error).context("failed to load command context");
        }
    };
    let outcome = brain.handle(&command, ctx)?;
    Ok(Some(outcome))
}

fn addressed_to(body: &str, bot_login: &str) -> bool {
    let Some(rest) = body.trim_start().strip_prefix('@') else {
        return false;
    };
    match rest.get(..bot_login.len()) {
        Some(mention) if mention.eq_ignore_ascii_case(bot_login) => !rest[bot_login.len()..]
            .starts_with(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
        _ => false,
    }
}

/// Best-effort failure reply for commands that never reached the brain.
fn report_load_failure(
    brain: &Brain,
    event: &IssueCommentEvent,
    github: &dyn GithubPlatform,
    logs: &LogsLocation,
) {
    let text = brain.languages().primary().render(
        ResponseKey::StepFailure,
        &[event.comment.user.login.as_str(), logs.address()],
    );
    if let Err(reply_error) = github.create_issue_comment(&event.issue, &text) {
        error!(error = %reply_error, "failed to report load failure");
    }
}
