//! Proteus probe CLI
//!
//! Plays the probe side of the registry protocol over HTTP: register a new
//! client, log in to obtain a bearer token, and push metadata updates.
//!
//! ## Usage Examples
//!
//! ```bash
//! proteus-probe --base-url http://localhost:8080 register \
//!   --probe-cc IT --probe-asn AS1234 --platform android \
//!   --software-name ooni-testing --software-version 0.0.1 \
//!   --supported-test web_connectivity --network-type wifi \
//!   --available-bandwidth 100 --language en --password testing
//!
//! proteus-probe login --client-id "$CLIENT_ID" --password testing
//!
//! proteus-probe update --client-id "$CLIENT_ID" --bearer-token "$TOKEN" \
//!   --probe-cc GR --probe-asn AS1234 ... --token XXX-Some-Real-Token
//! ```
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error (network, parsing, etc.)
//! - 2: Registry rejected the request
//! - 3: Authentication or authorization error

use clap::{Args, Parser, Subcommand, ValueEnum};
use proteus_registry::registry::{ClientData, ClientMetadata, LoginRequest};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::process;

/// Main CLI application structure
#[derive(Parser)]
#[command(
    name = "proteus-probe",
    about = "Proteus probe registry client",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Base URL of the registry server
    #[arg(long, env = "PROTEUS_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// JSON formatted output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Register a new probe
    Register(RegisterArgs),
    /// Exchange client credentials for a bearer token
    Login(LoginArgs),
    /// Replace the metadata of a registered probe
    Update(UpdateArgs),
}

/// Probe metadata shared by register and update
#[derive(Args)]
struct MetadataArgs {
    /// Two letter country code
    #[arg(long)]
    probe_cc: String,

    /// Autonomous system number, e.g. AS1234
    #[arg(long)]
    probe_asn: String,

    #[arg(long)]
    platform: String,

    #[arg(long)]
    software_name: String,

    #[arg(long)]
    software_version: String,

    /// Supported test name (can be specified multiple times)
    #[arg(long = "supported-test", required = true)]
    supported_tests: Vec<String>,

    #[arg(long)]
    network_type: String,

    #[arg(long)]
    available_bandwidth: String,

    #[arg(long)]
    language: String,

    /// Correlation token reported alongside the metadata
    #[arg(long, default_value = "")]
    token: String,
}

impl MetadataArgs {
    fn client_data(&self, password: String) -> ClientData {
        ClientData {
            metadata: ClientMetadata {
                probe_cc: self.probe_cc.clone(),
                probe_asn: self.probe_asn.clone(),
                platform: self.platform.clone(),
                software_name: self.software_name.clone(),
                software_version: self.software_version.clone(),
                supported_tests: self.supported_tests.iter().cloned().collect(),
                network_type: self.network_type.clone(),
                available_bandwidth: self.available_bandwidth.clone(),
                language: self.language.clone(),
            },
            token: self.token.clone(),
            password,
        }
    }
}

/// Arguments for registration
#[derive(Args)]
struct RegisterArgs {
    #[command(flatten)]
    metadata: MetadataArgs,

    /// Password used for later logins
    #[arg(long, env = "PROTEUS_PASSWORD")]
    password: String,
}

/// Arguments for login
#[derive(Args)]
struct LoginArgs {
    /// Client ID returned at registration
    #[arg(long, env = "PROTEUS_CLIENT_ID")]
    client_id: String,

    #[arg(long, env = "PROTEUS_PASSWORD")]
    password: String,
}

/// Arguments for metadata updates
#[derive(Args)]
struct UpdateArgs {
    /// Client ID returned at registration
    #[arg(long, env = "PROTEUS_CLIENT_ID")]
    client_id: String,

    /// Bearer token returned by login
    #[arg(long, env = "PROTEUS_BEARER_TOKEN")]
    bearer_token: String,

    #[command(flatten)]
    metadata: MetadataArgs,
}

/// Application errors
#[derive(Debug)]
enum AppError {
    /// Network or HTTP client errors
    Network(reqwest::Error),
    /// JSON parsing or serialization errors
    Json(serde_json::Error),
    /// The registry rejected the request
    Registry(String),
    /// Authentication or authorization errors
    Authentication(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Network(_) | AppError::Json(_) => 1,
            AppError::Registry(_) => 2,
            AppError::Authentication(_) => 3,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Network(err) => write!(f, "Network error: {}", err),
            AppError::Json(err) => write!(f, "JSON error: {}", err),
            AppError::Registry(msg) => write!(f, "Registry error: {}", msg),
            AppError::Authentication(msg) => write!(f, "Authentication error: {}", msg),
        }
    }
}

/// Main application entry point
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = Client::new();

    let result = match &cli.command {
        Commands::Register(args) => register(&cli, &client, args).await,
        Commands::Login(args) => login(&cli, &client, args).await,
        Commands::Update(args) => update(&cli, &client, args).await,
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        process::exit(err.exit_code());
    }
}

/// Register a new probe
async fn register(cli: &Cli, client: &Client, args: &RegisterArgs) -> Result<(), AppError> {
    let request = args.metadata.client_data(args.password.clone());

    if cli.verbose {
        eprintln!("Registration request: {:?}", request);
    }

    let url = format!("{}/api/v1/register", cli.base_url);
    let response = client.post(&url).json(&request).send().await?;

    if cli.verbose {
        eprintln!("Response status: {}", response.status());
    }

    match response.status() {
        StatusCode::OK => {
            let body: Value = response.json().await?;
            output_response(&cli.format, &body)
        }
        status => Err(AppError::Registry(format!(
            "Registration failed with status {}: {}",
            status,
            response.text().await?
        ))),
    }
}

/// Log in and print the issued bearer token
async fn login(cli: &Cli, client: &Client, args: &LoginArgs) -> Result<(), AppError> {
    let request = LoginRequest {
        username: args.client_id.clone(),
        password: args.password.clone(),
    };

    let url = format!("{}/api/v1/login", cli.base_url);
    let response = client.post(&url).json(&request).send().await?;

    if cli.verbose {
        eprintln!("Response status: {}", response.status());
    }

    match response.status() {
        StatusCode::OK => {
            let body: Value = response.json().await?;
            output_response(&cli.format, &body)
        }
        StatusCode::UNAUTHORIZED => Err(AppError::Authentication(
            "Invalid client ID or password".to_string(),
        )),
        status => Err(AppError::Registry(format!(
            "Login failed with status {}: {}",
            status,
            response.text().await?
        ))),
    }
}

/// Replace the metadata of a registered probe
async fn update(cli: &Cli, client: &Client, args: &UpdateArgs) -> Result<(), AppError> {
    let request = args.metadata.client_data(String::new());

    if cli.verbose {
        eprintln!("Updating client {}: {:?}", args.client_id, request);
    }

    let url = format!("{}/api/v1/update/{}", cli.base_url, args.client_id);
    let response = client
        .put(&url)
        .bearer_auth(&args.bearer_token)
        .json(&request)
        .send()
        .await?;

    if cli.verbose {
        eprintln!("Response status: {}", response.status());
    }

    match response.status() {
        StatusCode::OK => {
            let body: Value = response.json().await?;
            output_response(&cli.format, &body)
        }
        StatusCode::UNAUTHORIZED => Err(AppError::Authentication(
            "Bearer token is missing, invalid or expired".to_string(),
        )),
        StatusCode::FORBIDDEN => Err(AppError::Authentication(format!(
            "Bearer token was not issued to client '{}'",
            args.client_id
        ))),
        StatusCode::NOT_FOUND => Err(AppError::Registry(format!(
            "Client '{}' not found",
            args.client_id
        ))),
        status => Err(AppError::Registry(format!(
            "Update failed with status {}: {}",
            status,
            response.text().await?
        ))),
    }
}

/// Output response data in the requested format
fn output_response<T: Serialize>(format: &OutputFormat, data: &T) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(data)?);
        }
        OutputFormat::JsonPretty => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
    }
    Ok(())
}
