//! waitfor: block until dependencies are reachable.
//!
//! # Usage
//!
//! ```text
//! waitfor --tcp api=127.0.0.1:8443 --db db=postgres=postgres://localhost/app \
//!         --retries 30 --interval 2 -- ./server --port 8080
//! ```
//!
//! Exit codes: 0 when everything is ready (or the wrapped command's code),
//! 1 when a dependency never became ready, 2 on configuration errors.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use waitfor::config::{self, ConfigError, DependencyConfig, DependencyKind, WaitConfig};
use waitfor::observability::logging::{self, LogFormat};
use waitfor::WaitError;

#[derive(Parser, Debug)]
#[command(name = "waitfor")]
#[command(about = "Wait until TCP services, HTTP endpoints and databases are ready", long_about = None)]
struct Cli {
    /// TOML file describing dependencies and retry policy
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TCP dependency as NAME=HOST:PORT
    #[arg(long = "tcp", value_name = "NAME=ADDR", value_parser = parse_pair)]
    tcp: Vec<(String, String)>,

    /// HTTP dependency as NAME=URL
    #[arg(long = "http", value_name = "NAME=URL", value_parser = parse_pair)]
    http: Vec<(String, String)>,

    /// Database dependency as NAME=DRIVER=DATASOURCE
    #[arg(long = "db", value_name = "NAME=DRIVER=DATASOURCE", value_parser = parse_triple)]
    db: Vec<(String, String, String)>,

    /// Attempts per dependency (overrides the config file)
    #[arg(short, long)]
    retries: Option<u32>,

    /// Seconds between attempts (overrides the config file)
    #[arg(short, long)]
    interval: Option<f64>,

    /// Per-attempt deadline in seconds for TCP and HTTP checks given on the command line
    #[arg(short, long, default_value_t = 10.0)]
    timeout: f64,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    /// Command to run once every dependency is ready
    #[arg(last = true)]
    command: Vec<String>,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() && !value.is_empty() => {
            Ok((name.to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

fn parse_triple(s: &str) -> Result<(String, String, String), String> {
    let mut parts = s.splitn(3, '=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(driver), Some(datasource))
            if !name.is_empty() && !driver.is_empty() && !datasource.is_empty() =>
        {
            Ok((name.to_string(), driver.to_string(), datasource.to_string()))
        }
        _ => Err(format!("expected NAME=DRIVER=DATASOURCE, got '{}'", s)),
    }
}

fn dependency(name: &str, kind: DependencyKind, timeout_secs: f64) -> DependencyConfig {
    DependencyConfig {
        name: name.to_string(),
        kind,
        address: None,
        driver: None,
        datasource: None,
        url: None,
        timeout_secs,
    }
}

/// Merge the config file (if any) with command-line dependencies and overrides.
fn resolve_config(cli: &Cli) -> Result<WaitConfig, ConfigError> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => WaitConfig::default(),
    };

    for (name, address) in &cli.tcp {
        let mut dep = dependency(name, DependencyKind::Tcp, cli.timeout);
        dep.address = Some(address.clone());
        cfg.dependencies.push(dep);
    }
    for (name, url) in &cli.http {
        let mut dep = dependency(name, DependencyKind::Http, cli.timeout);
        dep.url = Some(url.clone());
        cfg.dependencies.push(dep);
    }
    for (name, driver, datasource) in &cli.db {
        let mut dep = dependency(name, DependencyKind::Database, cli.timeout);
        dep.driver = Some(driver.clone());
        dep.datasource = Some(datasource.clone());
        cfg.dependencies.push(dep);
    }

    if let Some(retries) = cli.retries {
        cfg.policy.retries = retries;
    }
    if let Some(interval) = cli.interval {
        cfg.policy.interval_secs = interval;
    }

    config::validate_config(&cfg).map_err(ConfigError::Validation)?;
    Ok(cfg)
}

async fn run_command(command: &[String]) -> ExitCode {
    let Some((program, args)) = command.split_first() else {
        return ExitCode::SUCCESS;
    };

    tracing::info!(command = %program, "Starting command");
    match tokio::process::Command::new(program).args(args).status().await {
        Ok(status) => match status.code() {
            Some(0) => ExitCode::SUCCESS,
            Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
            None => ExitCode::from(1),
        },
        Err(e) => {
            eprintln!("waitfor: failed to start '{}': {}", program, e);
            ExitCode::from(127)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = if cli.json { LogFormat::Json } else { LogFormat::Pretty };
    logging::init(&cli.log_level, format);

    let cfg = match resolve_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("waitfor: {}", e);
            return ExitCode::from(2);
        }
    };

    let (deps, policy) = cfg.build();
    if deps.is_empty() {
        tracing::warn!("No dependencies configured");
    }

    tracing::info!(
        dependencies = deps.len(),
        retries = policy.retries,
        interval_secs = policy.interval.as_secs_f64(),
        "Waiting for dependencies"
    );

    match deps.wait_with(policy).await {
        Ok(()) => {
            tracing::info!("All dependencies ready");
            run_command(&cli.command).await
        }
        Err(WaitError::InvalidPolicy(e)) => {
            eprintln!("waitfor: invalid retry policy: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
