use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gapi::api::auth::{fetch_adc_token, DEFAULT_SCOPES};
use gapi::config::Config;
use gapi::error::format_api_error;
use gapi::resource::{list_all, Arg, ServiceDescriptor};
use gapi::{AuthMode, Service};
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Call Google-style REST APIs described by a spec file
#[derive(Parser, Debug)]
#[command(name = "gapi", version, about, long_about = None)]
struct Args {
    /// Service spec file (YAML or JSON)
    #[arg(short, long)]
    spec: Option<PathBuf>,

    /// OAuth 2.0 access token
    #[arg(short, long)]
    token: Option<String>,

    /// Obtain the access token from Application Default Credentials
    #[arg(long, conflicts_with = "token")]
    adc: bool,

    /// OAuth scope to request with --adc (repeatable)
    #[arg(long = "scope", requires = "adc")]
    scopes: Vec<String>,

    /// Base host, e.g. https://www.googleapis.com
    #[arg(long)]
    server: Option<String>,

    /// Send the token as an access_token query parameter
    #[arg(long)]
    query_auth: bool,

    /// Remember --server and --spec for later runs
    #[arg(long)]
    save: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the generated methods
    Methods,
    /// Invoke a generated method
    Call {
        /// Method name, e.g. listVideos
        method: String,
        /// Path segments, JSON objects, or null
        args: Vec<String>,
        /// Follow nextPageToken and print every item
        #[arg(long)]
        all: bool,
    },
    /// GET an arbitrary path below the service URL
    Get {
        args: Vec<String>,
    },
    /// POST to an arbitrary path below the service URL
    Post {
        args: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gapi started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = Config::config_dir() {
        return config_dir.join("gapi.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gapi").join("gapi.log");
    }
    PathBuf::from("gapi.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if let Err(err) = run(args).await {
        tracing::error!("{:?}", err);
        eprintln!("Error: {}", format_api_error(&err));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();

    let spec_path = args
        .spec
        .clone()
        .or_else(|| config.spec.clone())
        .context("No spec file given. Pass --spec FILE")?;
    let descriptor = ServiceDescriptor::load(&spec_path)?;

    let server = config.resolve_server(args.server.clone(), descriptor.server.clone());

    let auth_mode = if args.query_auth {
        AuthMode::QueryParam
    } else {
        config.effective_auth_mode()
    };

    if let Some(token) = &args.token {
        gapi::init(token.clone());
    } else if args.adc {
        let scopes: Vec<&str> = if args.scopes.is_empty() {
            DEFAULT_SCOPES.to_vec()
        } else {
            args.scopes.iter().map(|s| s.as_str()).collect()
        };
        gapi::init(fetch_adc_token(&scopes).await?);
    }

    let service = Service::from_descriptor(descriptor)
        .server(server.clone())
        .auth_mode(auth_mode)
        .build()?;

    if args.save {
        config.server = Some(server);
        config.spec = Some(spec_path);
        config.save().context("Failed to save config")?;
    }

    match args.command {
        Command::Methods => {
            for method in service.methods() {
                println!(
                    "{:<32} {:<6} {}",
                    method.name,
                    method.action.http_method().as_str(),
                    method.path_template()
                );
            }
        },
        Command::Call { method, args, all } => {
            let call_args = parse_args(&args)?;
            if all {
                let items = list_all(&service, &method, &call_args).await?;
                print_json(&Value::Array(items))?;
            } else {
                print_json(&service.call(&method, &call_args).await?)?;
            }
        },
        Command::Get { args } => {
            print_json(&service.get(&parse_args(&args)?).await?)?;
        },
        Command::Post { args } => {
            print_json(&service.post(&parse_args(&args)?).await?)?;
        },
    }

    Ok(())
}

fn parse_args(raw: &[String]) -> Result<Vec<Arg>> {
    raw.iter().map(|s| Arg::parse_cli(s)).collect()
}

fn print_json(value: &Value) -> Result<()> {
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}
