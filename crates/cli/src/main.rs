//! EPI CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration** — wiki URL, script path, edit token and timeout
//!    from flags or `EPI_*` environment variables.
//! 2. **Wire observability** — configure `tracing-subscriber` with a pretty or
//!    JSON layer on stderr and, when an endpoint is given, an OpenTelemetry
//!    OTLP exporter. All `tracing` spans emitted by `epi` and `mediawiki`
//!    flow through these layers.
//! 3. **Construct infrastructure** — create the [`mediawiki::ReqwestTransport`]
//!    and a token provider and inject them into [`epi::UserApi`].
//! 4. **Run one operation** — print its result as JSON on stdout.

mod observability;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use epi::{
    BanParams, BlockParams, EditToken, Expiry, TokenProvider, UserApi, UserId, UserIdLookupParams,
    Username,
};
use mediawiki::{EnvTokenProvider, ReqwestTransport, StaticTokenProvider, WikiConfig};
use serde_json::{json, Value};

use crate::observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "epi", version, about = "One-line MediaWiki user moderation")]
struct Cli {
    /// Base URL of the wiki, e.g. https://community.example.org
    #[arg(long, env = "EPI_WIKI_URL")]
    wiki_url: String,

    /// Path under the base URL holding index.php and api.php, e.g. /w
    #[arg(long, env = "EPI_SCRIPT_PATH", default_value = "")]
    script_path: String,

    /// Edit token for ban and block. Without it, EPI_EDIT_TOKEN is read on
    /// each state-changing call.
    #[arg(long)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Log output format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// OTLP collector endpoint for trace export
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ban a user from chat
    Ban {
        /// Numeric id of the user (see `user-id`)
        #[arg(long)]
        user_id: u64,
        /// Seconds, a wiki duration such as "1 day", "infinite" or an RFC 3339 time
        #[arg(long)]
        duration: Expiry,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Block a user from editing
    Block {
        username: String,
        /// Seconds, a wiki duration such as "2 weeks", "infinite" or an RFC 3339 time
        #[arg(long, default_value = "infinite")]
        expiry: Expiry,
        #[arg(long)]
        reason: Option<String>,
        /// Prevent account creation
        #[arg(long)]
        nocreate: bool,
        /// Autoblock the user's last IP address
        #[arg(long)]
        autoblock: bool,
    },
    /// Look up a user's numeric id
    UserId { username: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let telemetry = observability::init(cli.log_format, cli.otlp_endpoint.as_deref())?;

    let outcome = run(cli).await;

    telemetry.shutdown();
    let value = outcome?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<Value> {
    let config = WikiConfig::with_script_path(&cli.wiki_url, &cli.script_path)?
        .timeout(Duration::from_secs(cli.timeout_secs));
    let transport = ReqwestTransport::new(config)?;

    // Without --token the environment is consulted per call; read-only
    // commands never ask for a token.
    let tokens: Arc<dyn TokenProvider> = match cli.token {
        Some(token) => Arc::new(StaticTokenProvider::new(
            EditToken::new(token).context("--token must not be empty")?,
        )),
        None => Arc::new(EnvTokenProvider::default()),
    };
    let api = UserApi::new(Arc::new(transport), tokens);

    match cli.command {
        Command::Ban {
            user_id,
            duration,
            reason,
        } => {
            let params = BanParams {
                user_id: UserId::new(user_id),
                duration,
                reason,
            };
            api.ban(params)
                .await
                .with_context(|| format!("Chat ban of user {user_id} failed"))
        }
        Command::Block {
            username,
            expiry,
            reason,
            nocreate,
            autoblock,
        } => {
            let params = block_params(&username, expiry, reason, nocreate, autoblock)?;
            api.block(params)
                .await
                .with_context(|| format!("Block of '{username}' failed"))
        }
        Command::UserId { username } => {
            let params = UserIdLookupParams::new(parse_username(&username)?);
            let id = api
                .user_id(params)
                .await
                .with_context(|| format!("User id lookup of '{username}' failed"))?;
            Ok(json!({ "username": username, "userid": id.as_u64() }))
        }
    }
}

/// Maps the `--nocreate` / `--autoblock` switches onto the `allow_*` defaults.
fn block_params(
    username: &str,
    expiry: Expiry,
    reason: Option<String>,
    nocreate: bool,
    autoblock: bool,
) -> Result<BlockParams> {
    Ok(BlockParams {
        username: parse_username(username)?,
        duration: expiry,
        reason,
        allow_account_creation: !nocreate,
        allow_autoblock_exemption: !autoblock,
    })
}

fn parse_username(name: &str) -> Result<Username> {
    Username::new(name).context("username must not be empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_from_args(args: &[&str]) -> BlockParams {
        let mut argv = vec!["epi", "--wiki-url", "https://wiki.example.org", "block"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Block {
                username,
                expiry,
                reason,
                nocreate,
                autoblock,
            } => block_params(&username, expiry, reason, nocreate, autoblock).unwrap(),
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn block_defaults_allow_everything() {
        let params = block_from_args(&["Vandal"]);
        assert!(params.allow_account_creation);
        assert!(params.allow_autoblock_exemption);
        assert_eq!(params.duration, Expiry::Token("infinite".into()));
        assert_eq!(params.reason, None);
    }

    #[test]
    fn block_switches_turn_off_allowances_independently() {
        let params = block_from_args(&["Vandal", "--nocreate"]);
        assert!(!params.allow_account_creation);
        assert!(params.allow_autoblock_exemption);

        let params = block_from_args(&["Vandal", "--autoblock"]);
        assert!(params.allow_account_creation);
        assert!(!params.allow_autoblock_exemption);
    }

    #[test]
    fn durations_pass_through_as_typed() {
        let params = block_from_args(&["Vandal", "--expiry", "007"]);
        assert_eq!(params.duration.to_string(), "007");
    }

    #[test]
    fn token_flag_does_not_read_the_environment() {
        // Left to EnvTokenProvider, which reads it per call.
        std::env::set_var("EPI_EDIT_TOKEN", "from-env");
        let cli = Cli::try_parse_from([
            "epi",
            "--wiki-url",
            "https://wiki.example.org",
            "user-id",
            "Sannse",
        ])
        .unwrap();
        assert_eq!(cli.token, None);
    }
}
