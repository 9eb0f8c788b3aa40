//! `authretry-cli` commands.
//!
//! The binary only parses arguments and calls [`run`]; everything else lives
//! here so it can be driven from integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use thiserror::Error;
use tracing_subscriber::util::TryInitError;
use url::Url;

use crate::config::{load_config, ClientConfig, ConfigError, ValidationError};
use crate::http::{AuthenticatingClient, ClientError, CredentialInterceptor, RequestInterceptor};
use crate::observability::logging::init_logging;
use crate::reauth::{Callback, CallbackError, ChallengeResponse, Coordinator, FnCallback, Request, Route};

#[derive(Debug, Parser)]
#[command(name = "authretry-cli")]
#[command(about = "Issue HTTP requests that reauthenticate on 401", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the file given with --config and print the effective settings
    Check,
    /// GET a URL, attaching the credential after the first challenge
    Get(GetArgs),
}

#[derive(Debug, Args)]
pub struct GetArgs {
    pub url: String,

    /// Header that carries the credential
    #[arg(long, default_value = "Authorization")]
    pub credential_header: String,

    /// Credential value to attach when challenged
    #[arg(long)]
    pub credential: Option<String>,

    /// Mark the request so challenges are never retried
    #[arg(long)]
    pub ignore: bool,
}

/// Error type for CLI commands. Any of these makes the process exit non-zero.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("check requires --config <path>")]
    MissingConfig,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] TryInitError),

    #[error("Invalid header: {0}")]
    Header(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Check => {
            let path = cli.config.as_deref().ok_or(CliError::MissingConfig)?;
            let config = check_config(Some(path))?;
            start_logging(&config, Some(path))?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Get(args) => {
            let config = match cli.config.as_deref() {
                Some(path) => load_config(path)?,
                None => ClientConfig::default(),
            };
            start_logging(&config, cli.config.as_deref())?;

            let response = get(&config, args).await?;
            let status = response.status();
            let body = ensure_success(response).await?;
            println!("Status: {}", status);
            println!("{}", body);
        }
    }
    Ok(())
}

/// Load and validate the config file for `check`.
pub fn check_config(path: Option<&Path>) -> Result<ClientConfig, CliError> {
    let path = path.ok_or(CliError::MissingConfig)?;
    Ok(load_config(path)?)
}

fn start_logging(config: &ClientConfig, path: Option<&Path>) -> Result<(), CliError> {
    init_logging(&config.observability)?;
    tracing::info!(
        path = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "<defaults>".into()),
        retry_bound = config.reauth.retry_bound,
        ignore_header = %config.reauth.ignore_header,
        "Configuration loaded"
    );
    Ok(())
}

/// Issue the `get` request through an authenticating client.
///
/// Returns whatever the pipeline returns, including a final 401.
pub async fn get(config: &ClientConfig, args: &GetArgs) -> Result<Response, CliError> {
    let header = HeaderName::from_bytes(args.credential_header.as_bytes())
        .map_err(|e| CliError::Header(format!("{}: {}", args.credential_header, e)))?;
    let credential = args
        .credential
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .map_err(|e| CliError::Header(format!("credential value: {}", e)))?;

    let credentials = CredentialInterceptor::new(header);
    let coordinator = Coordinator::new(
        config.reauth.clone(),
        login_callback(credentials.clone(), credential),
    )?;
    let client =
        AuthenticatingClient::new(config, Arc::new(coordinator))?.with_interceptor(credentials);

    let mut request = Request::get(Url::parse(&args.url)?);
    if args.ignore {
        let marker = client.coordinator().ignore_header().clone();
        request = request.with_header(marker, HeaderValue::from_static("true"));
    }

    Ok(client.execute(request).await?)
}

/// Read the body, failing on any non-success status.
pub async fn ensure_success(response: Response) -> Result<String, CliError> {
    let status = response.status();
    let body = response.text().await.map_err(ClientError::from)?;
    if !status.is_success() {
        return Err(CliError::Status { status, body });
    }
    Ok(body)
}

/// Reattach `credential` on challenge, and drop it once the bound is hit.
fn login_callback(credentials: CredentialInterceptor, credential: Option<HeaderValue>) -> impl Callback {
    let on_unable = credentials.clone();
    FnCallback::new(
        move |route: &Route, response: &ChallengeResponse| -> Result<Option<Request>, CallbackError> {
            let Some(value) = credential.clone() else {
                tracing::warn!(route = %route, "No credential configured, not retrying");
                return Ok(None);
            };
            credentials.set(value);
            let mut request = response.request().clone();
            credentials.intercept(&mut request);
            Ok(Some(request))
        },
        move |route: &Route, response: &ChallengeResponse| -> Result<(), CallbackError> {
            tracing::error!(
                route = %route,
                attempts = response.attempt_count(),
                "Unable to authenticate, clearing credential"
            );
            on_unable.clear();
            Ok(())
        },
    )
}
