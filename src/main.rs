use std::io::BufRead;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use reindexer::config::ResolverConfig;
use reindexer::dispatch::{ChangeEvent, ReplicationDispatcher};
use reindexer::impact::{resolve, ChangeKeys, Impact};
use reindexer::index_graph::SchemaConfig;

/// Reindexer - incremental reindex impact resolution for a search index
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the YAML schema describing foreign-key chains
    #[arg(long, env = "REINDEXER_SCHEMA", default_value = "schema.yaml")]
    schema: String,

    /// Resolve a single table change instead of reading events from stdin
    #[arg(long, requires = "keys")]
    table: Option<String>,

    /// Comma-separated key values for --table
    #[arg(long, requires = "table")]
    keys: Option<String>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ResolverConfig::from_cli(cli.schema)?;

    let schema = SchemaConfig::from_yaml_file(&config.schema_path)
        .with_context(|| format!("loading schema from '{}'", config.schema_path))?;
    let registry = Arc::new(schema.build().context("building chain registry")?);

    if let (Some(table), Some(keys)) = (cli.table, cli.keys) {
        return resolve_once(&registry, &table, &keys);
    }

    // Stream mode: one JSON change event per stdin line, one output line per
    // resolvable event. Bad events are logged and skipped.
    let dispatcher = ReplicationDispatcher::new(registry);
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading change events from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let event = match ChangeEvent::from_json_line(&line) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("skipping malformed change event: {e}");
                continue;
            }
        };
        match dispatcher.dispatch(&event) {
            Some(Impact::Query(sql)) => println!("{sql}"),
            Some(Impact::HeadIds) => println!("-- {}: keys are already head ids", event.table),
            None => {}
        }
    }
    Ok(())
}

fn resolve_once(
    registry: &reindexer::index_graph::ChainRegistry,
    table: &str,
    keys: &str,
) -> anyhow::Result<()> {
    let keys = keys
        .split(',')
        .map(|k| {
            k.trim()
                .parse::<i64>()
                .with_context(|| format!("key '{}' is not an integer", k.trim()))
        })
        .collect::<anyhow::Result<ChangeKeys>>()?;

    let node = registry.lookup(table)?;
    match resolve(node, &keys)? {
        Impact::HeadIds => println!("-- {table}: keys are already head ids"),
        Impact::Query(sql) => println!("{sql}"),
    }
    Ok(())
}
