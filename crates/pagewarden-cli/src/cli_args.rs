use std::path::PathBuf;

use clap::Parser;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "pagewarden",
    about = "Answers one GitHub issue comment addressed to the pagewarden agent"
)]
pub(crate) struct Cli {
    #[arg(
        long = "event-file",
        env = "PAGEWARDEN_EVENT_FILE",
        help = "Path to the issue_comment webhook payload (JSON) to answer"
    )]
    pub event_file: PathBuf,

    #[arg(
        long = "github-api-base",
        env = "PAGEWARDEN_GITHUB_API_BASE",
        default_value = "https://api.github.com",
        help = "GitHub API base URL"
    )]
    pub github_api_base: String,

    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub token used to read repositories, post replies and star repositories"
    )]
    pub github_token: String,

    #[arg(
        long = "bot-login",
        env = "PAGEWARDEN_BOT_LOGIN",
        help = "Login of the agent's own account; its comments are ignored"
    )]
    pub bot_login: Option<String>,

    #[arg(
        long = "request-timeout-ms",
        env = "PAGEWARDEN_REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Timeout for each GitHub or indexer HTTP request"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "logs-address",
        env = "PAGEWARDEN_LOGS_ADDRESS",
        default_value = "the agent's log output",
        help = "Where operators publish the agent logs; quoted in replies"
    )]
    pub logs_address: String,

    #[arg(
        long = "index-endpoint",
        env = "PAGEWARDEN_INDEX_ENDPOINT",
        help = "URL receiving index requests; when unset, requests are only logged"
    )]
    pub index_endpoint: Option<String>,

    #[arg(
        long = "languages-file",
        env = "PAGEWARDEN_LANGUAGES_FILE",
        help = "Optional TOML file declaring the languages in priority order"
    )]
    pub languages_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{parse_positive_u64, Cli};

    #[test]
    fn unit_parse_positive_u64_rejects_zero_and_garbage() {
        assert_eq!(parse_positive_u64("250"), Ok(250));
        assert!(parse_positive_u64("0").is_err());
        assert!(parse_positive_u64("soon").is_err());
    }

    #[test]
    fn functional_cli_applies_defaults() {
        let cli = Cli::try_parse_from([
            "pagewarden",
            "--event-file",
            "event.json",
            "--github-token",
            "token",
        ])
        .expect("parse");
        assert_eq!(cli.github_api_base, "https://api.github.com");
        assert_eq!(cli.request_timeout_ms, 30_000);
        assert!(cli.index_endpoint.is_none());
        assert!(cli.languages_file.is_none());
    }

    #[test]
    fn regression_cli_rejects_zero_timeout() {
        let parsed = Cli::try_parse_from([
            "pagewarden",
            "--event-file",
            "event.json",
            "--github-token",
            "token",
            "--request-timeout-ms",
            "0",
        ]);
        assert!(parsed.is_err());
    }
}
