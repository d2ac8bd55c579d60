//! Run a file of SQL statements against SQL Server as one batch.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mssql_adapter::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a SQL batch against SQL Server")]
struct Args {
    /// SQL file to run; statements are separated by `;`.
    sql: PathBuf,
    /// JSON configuration file; command-line options override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    instance_name: Option<String>,
    #[arg(long)]
    user: Option<String>,
    #[arg(long, env = "MSSQL_PASSWORD")]
    password: Option<String>,
    #[arg(long)]
    database: Option<String>,
    #[arg(long)]
    prefix: Option<String>,
    #[arg(long, value_enum)]
    on_error: Option<ErrorPolicy>,
    /// Wrap the batch in a transaction.
    #[arg(long)]
    transaction_safe: bool,
    /// Log every executed statement.
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn adapter_config(&self) -> Result<AdapterConfig, AdapterError> {
        let mut config = match &self.config {
            Some(path) => AdapterConfig::from_file(path)?,
            None => AdapterConfig::default(),
        };
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.instance_name.is_some() {
            config.instance_name.clone_from(&self.instance_name);
        }
        if let Some(user) = &self.user {
            config.user.clone_from(user);
        }
        if let Some(password) = &self.password {
            config.password.clone_from(password);
        }
        if let Some(database) = &self.database {
            config.database.clone_from(database);
        }
        if let Some(prefix) = &self.prefix {
            config.prefix.clone_from(prefix);
        }
        if let Some(policy) = self.on_error {
            config.error_policy = policy;
        }
        config.debug |= self.debug;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<bool, AdapterError> {
    let config = args.adapter_config()?;
    let sql = std::fs::read_to_string(&args.sql)?;
    let policy = config.error_policy;

    let mut db = SqlSrvAdapter::open(TiberiusClient::new(), config)?;
    let result = db.execute_batch(&sql, policy, args.transaction_safe)?;

    for outcome in result.outcomes() {
        match &outcome.outcome {
            Outcome::Success(cursor) => tracing::info!(%cursor, sql = %outcome.sql, "ok"),
            Outcome::Failure { code, message } => {
                tracing::error!(%code, %message, sql = %outcome.sql, "failed");
            }
        }
    }
    tracing::info!(
        statements = result.len(),
        failures = result.failures(),
        queries = db.query_count(),
        "batch finished"
    );
    db.disconnect();
    Ok(result.succeeded())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(2)
        }
    }
}
