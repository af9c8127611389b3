//! `llm-council`: run a three-round council debate from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Debate a query (reads stdin when no query is given)
//! llm-council ask "Should we use microservices?"
//!
//! # Machine-readable output
//! echo "Rust or Go for a CLI?" | llm-council ask --json
//!
//! # Check that every configured deployment answers
//! llm-council check
//! ```
//!
//! Settings come from `--config <file.toml>`, then environment variables
//! (a `.env` file is loaded first), then the flags below.

use std::io::Read;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coordination::{format_debate, CouncilConfig, DebateError, DebateNotice, DebateOrchestrator};
use council_agents::{
    check_deployments, check_invoker, failure_report, render_outcomes, telemetry, ConfigStatus,
    CouncilSettings, SettingsError, EMPTY_QUERY_MESSAGE,
};
use tokio::sync::oneshot;
use tracing::info;

/// Three-round LLM council debates over Azure OpenAI deployments
#[derive(Parser, Debug)]
#[command(name = "llm-council", author, version, about, long_about = None)]
struct Cli {
    /// TOML settings file; environment variables override its values
    #[arg(long, global = true, env = "COUNCIL_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging when RUST_LOG is unset
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Per-attempt model call timeout in seconds (overrides AGENT_TIMEOUT)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Bound on the whole debate in seconds (overrides COUNCIL_DEBATE_DEADLINE)
    #[arg(long, global = true)]
    deadline: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a debate and print the formatted transcript and verdict
    Ask {
        /// Question or topic; read from stdin when omitted
        query: Option<String>,

        /// Print the debate result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Send a one-word request to each configured deployment
    Check,
}

impl Cli {
    fn settings_overrides(&self) -> CouncilSettings {
        CouncilSettings {
            timeout_secs: self.timeout,
            debate_deadline_secs: self.deadline,
            ..CouncilSettings::default()
        }
    }

    /// Apply the flags on top of `base` and validate.
    fn resolve(&self, base: CouncilSettings) -> Result<CouncilConfig, SettingsError> {
        base.overlay(self.settings_overrides()).into_config()
    }

    /// Resolve settings or print the failure report and exit.
    fn council_config(&self) -> CouncilConfig {
        let resolved =
            CouncilSettings::load(self.config.as_deref()).and_then(|base| self.resolve(base));
        match resolved {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", failure_report(&e, None));
                process::exit(1);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match &cli.command {
        Command::Ask { query, json } => {
            let query = match query {
                Some(q) => q.clone(),
                None => read_stdin().context("reading query from stdin")?,
            };
            ask(&cli, &query, *json).await
        }
        Command::Check => check(&cli).await,
    }
}

async fn ask(cli: &Cli, query: &str, json: bool) -> Result<()> {
    if query.trim().is_empty() {
        eprintln!("{EMPTY_QUERY_MESSAGE}");
        process::exit(2);
    }

    let config = cli.council_config();
    let status = ConfigStatus::from_config(&config);
    info!(
        endpoint = %config.endpoint,
        member_a = %config.member_a.model,
        member_b = %config.member_b.model,
        chair = %config.chair.model,
        "LLM council starting"
    );
    let orchestrator =
        DebateOrchestrator::from_config(config).context("initialising debate orchestrator")?;

    let (notice_tx, notice_rx) = oneshot::channel::<DebateNotice>();
    let notice = tokio::spawn(async move {
        if let Ok(notice) = notice_rx.await {
            eprintln!("{}", notice.message());
        }
    });

    let outcome = orchestrator
        .conduct_debate_with_notice(query, notice_tx)
        .await;
    let _ = notice.await;

    match outcome {
        Ok(result) => {
            if json {
                let text =
                    serde_json::to_string_pretty(&result).context("serialising debate result")?;
                println!("{text}");
            } else {
                println!("{}", format_debate(&result, &orchestrator.display_names()));
            }
            Ok(())
        }
        Err(DebateError::EmptyQuery) => {
            eprintln!("{EMPTY_QUERY_MESSAGE}");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("{}", failure_report(&e, Some(&status)));
            process::exit(1);
        }
    }
}

async fn check(cli: &Cli) -> Result<()> {
    let config = cli.council_config();
    let invoker = check_invoker(&config).context("building HTTP client")?;
    let outcomes = check_deployments(&config, &invoker).await;
    print!("{}", render_outcomes(&config, &outcomes));

    if outcomes.iter().any(|o| !o.is_success()) {
        process::exit(1);
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn base() -> CouncilSettings {
        CouncilSettings {
            endpoint: Some("https://acct.openai.azure.com".to_string()),
            api_key: Some("key".to_string()),
            timeout_secs: Some(60),
            debate_deadline_secs: Some(900),
            ..CouncilSettings::default()
        }
    }

    #[test]
    fn test_parse_ask_with_global_flags() {
        let cli = Cli::try_parse_from([
            "llm-council",
            "--deadline",
            "120",
            "ask",
            "Should we use microservices?",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.deadline, Some(120));
        assert!(cli.timeout.is_none());
        match cli.command {
            Command::Ask { query, json } => {
                assert_eq!(query.as_deref(), Some("Should we use microservices?"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ask_query_is_optional() {
        let cli = Cli::try_parse_from(["llm-council", "ask"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Ask {
                query: None,
                json: false
            }
        ));
    }

    #[test]
    fn test_parse_check_with_verbose() {
        let cli = Cli::try_parse_from(["llm-council", "check", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Check));
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["llm-council"]).is_err());
    }

    #[test]
    fn test_flags_override_lower_layers() {
        let cli =
            Cli::try_parse_from(["llm-council", "--timeout", "15", "--deadline", "300", "check"])
                .unwrap();
        let config = cli.resolve(base()).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.debate_deadline, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_absent_flags_keep_lower_layers() {
        let cli = Cli::try_parse_from(["llm-council", "check"]).unwrap();
        let config = cli.resolve(base()).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.debate_deadline, Some(Duration::from_secs(900)));
    }

    #[test]
    fn test_zero_deadline_flag_is_rejected() {
        let cli = Cli::try_parse_from(["llm-council", "--deadline", "0", "ask", "Q?"]).unwrap();
        let err = cli.resolve(base()).unwrap_err();
        assert!(err.to_string().contains("deadline"));
    }
}
