//! `infomaniak-node` CLI entry-point.
//!
//! Available sub-commands:
//! - `operations`: list every (resource, operation) pair and its endpoint.
//! - `build`:      dry-run the request builder for one item.
//! - `run`:        execute a JSON array of items against the live API.
//! - `verify`:     check that the access token is accepted.
//!
//! Logs go to stderr; stdout carries JSON only (except `operations`).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine::{ExecutorConfig, ItemExecutor};
use nodes::infomaniak::{
    build_request, table, InfomaniakNode, NodeConfig, OperationKey, Resource, ACCESS_TOKEN,
    DEFAULT_BASE_URL,
};
use nodes::traits::ExecutionContext;
use nodes::{HttpTransport, ParameterBag, TransportConfig};

#[derive(Parser)]
#[command(
    name = "infomaniak-node",
    about = "Build and run Infomaniak API calls item by item",
    version
)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Connection {
    /// Bearer token for the Infomaniak API.
    #[arg(long, env = "INFOMANIAK_ACCESS_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// API origin the request paths are appended to.
    #[arg(long, env = "INFOMANIAK_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Per-request timeout.
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Command {
    /// List the operation table.
    Operations {
        /// Only show operations of this resource (e.g. `kdrive`).
        #[arg(long)]
        resource: Option<Resource>,
    },
    /// Print the request descriptor an item would produce, without sending it.
    Build {
        #[arg(long)]
        resource: String,
        #[arg(long)]
        operation: String,
        /// Item parameters as an inline JSON object.
        #[arg(long, conflicts_with = "params_file")]
        params: Option<String>,
        /// Item parameters read from a JSON file.
        #[arg(long)]
        params_file: Option<PathBuf>,
    },
    /// Execute every item of a JSON array file and print the output records.
    Run {
        /// JSON array of parameter objects, each carrying `resource` and `operation`.
        #[arg(long)]
        items: PathBuf,
        /// Emit an error record for a failing item instead of aborting.
        #[arg(long)]
        continue_on_fail: bool,
    },
    /// Check the access token against the profile endpoint.
    Verify,
}

impl Connection {
    fn node(&self) -> Result<InfomaniakNode> {
        let config = TransportConfig::default().with_timeout(Duration::from_secs(self.timeout_secs));
        let transport = HttpTransport::new(config).context("failed to build HTTP client")?;
        Ok(InfomaniakNode::new(
            Arc::new(transport),
            NodeConfig {
                base_url: self.base_url.clone(),
            },
        ))
    }

    fn context(&self) -> Result<ExecutionContext> {
        let token = self
            .token
            .as_deref()
            .context("no access token: pass --token or set INFOMANIAK_ACCESS_TOKEN")?;
        Ok(ExecutionContext::with_secret(ACCESS_TOKEN, token))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Operations { resource } => list_operations(resource),
        Command::Build {
            resource,
            operation,
            params,
            params_file,
        } => {
            let raw = match (params, params_file) {
                (Some(inline), _) => inline,
                (None, Some(path)) => read(&path)?,
                (None, None) => "{}".to_owned(),
            };
            let mut bag = parse_bag(&raw).context("invalid --params")?;
            bag.insert("resource", resource.as_str());
            bag.insert("operation", operation.as_str());

            let key = OperationKey::from_params(&bag)?;
            let descriptor = build_request(key, &bag)?;
            print_json(&descriptor)
        }
        Command::Run {
            items,
            continue_on_fail,
        } => {
            let raw = read(&items)?;
            let items: Vec<ParameterBag> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array of objects", items.display()))?;

            let node = cli.connection.node()?;
            let ctx = cli.connection.context()?;
            info!("running {} items (execution {})", items.len(), ctx.execution_id);

            let executor = ItemExecutor::new(ExecutorConfig { continue_on_fail });
            let result = executor.run(&node, &items, &ctx).await?;
            print_json(&result)
        }
        Command::Verify => {
            let node = cli.connection.node()?;
            let ctx = cli.connection.context()?;
            let profile = node
                .test_credentials(&ctx)
                .await
                .context("credential check failed")?;
            info!("access token accepted");
            print_json(&profile)
        }
    }
}

fn list_operations(filter: Option<Resource>) -> Result<()> {
    for key in OperationKey::all().filter(|key| filter.map_or(true, |r| r == key.resource)) {
        let Some(rule) = table::lookup(key) else {
            bail!("operation table has no rule for {key}");
        };
        let list = if rule.list { "  (list)" } else { "" };
        println!(
            "{:<13} {:<28} {:<6} {}{}",
            key.resource,
            key.operation,
            rule.method,
            rule.path.shape(),
            list
        );
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn parse_bag(raw: &str) -> Result<ParameterBag> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(ParameterBag::from_value(value)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
