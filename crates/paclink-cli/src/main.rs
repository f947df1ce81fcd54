// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! paclink Control CLI
//!
//! CLI tool for driving paclink features against a controller.
//!
//! Usage:
//!   paclink-ctl <command> [options]
//!
//! Commands:
//!   process-recipes               Run the recipe save/restore state machine
//!   historize [--url <collector>] Export historian variables
//!   process-logs [--url <collector>]  Dispatch raised log triggers
//!   find <kind> <regex>           Search variable names by regex
//!   get <name>                    Read one variable
//!   set <name> <json-value>       Write one variable
//!   device                        Show controller device details
//!   strategy                      Show running strategy details

use std::process::ExitCode;
use std::sync::Arc;

use paclink_client::PacClient;
use paclink_core::{
    FsRecipeFileStore, PreserverConfig, ProcessOutcome, RecipePreserver, VarKind, VarValue,
    WriteDurability, find_matching,
};
use paclink_historian::{
    Historian, HistorianConfig, HttpSink, LogConfig, LogDispatcher, NotificationSink, StdoutSink,
};

/// Default backup directory on the controller filesystem.
const DEFAULT_RECIPE_DIR: &str = "/home/dev/secured/recipe_data";

fn print_usage() {
    eprintln!(
        r#"Usage: paclink-ctl <command> [options]

Drive paclink features against a controller.

COMMANDS:
    process-recipes                 Run the recipe save/restore state machine
    historize                       Export historian variables
    process-logs                    Dispatch raised log triggers
    find <kind> <regex>             Search variable names by regex
    get <name>                      Read one variable
    set <name> <json-value>         Write one variable
    device                          Show controller device details
    strategy                        Show running strategy details

HISTORIZE / PROCESS-LOGS OPTIONS:
    --url <collector>               POST documents to this URL
                                    (default: print JSON lines to stdout)

FIND KINDS:
    analog_input, analog_output, digital_input, digital_output,
    int32, int32_table, float, float_table, string, string_table,
    up_timer, down_timer

ENVIRONMENT:
    PACLINK_API_KEY                 PAC Control REST API key (required)
    PACLINK_HOSTNAME                Controller host (default: localhost)
    PACLINK_VERIFY_TLS              Verify TLS certificates (default: false)
    PACLINK_TIMEOUT_MS              Request timeout in ms (default: 10000)
    PACLINK_RECIPE_DIR              Backup directory
                                    (default: {DEFAULT_RECIPE_DIR})
    PACLINK_CONTROLLER              Controller tag on historian/log
                                    documents (default: PACLINK_HOSTNAME)
    PACLINK_SYNC_WRITES             Await backup writes during the save
                                    pass (default: false)

EXAMPLES:
    # Run the recipe state machine once
    paclink-ctl process-recipes

    # Export historian points to a collector
    paclink-ctl historize --url http://historian.local/write

    # Find every recipe float
    paclink-ctl find float '^r'
"#
    );
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_subscriber();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let result = match command {
        "process-recipes" => process_recipes().await,
        "historize" => historize(&args[1..]).await,
        "process-logs" => process_logs(&args[1..]).await,
        "find" => find(&args[1..]).await,
        "get" => get(&args[1..]).await,
        "set" => set(&args[1..]).await,
        "device" => device().await,
        "strategy" => strategy().await,
        "help" | "--help" | "-h" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
}

fn client() -> anyhow::Result<Arc<PacClient>> {
    Ok(Arc::new(PacClient::from_env()?))
}

/// Controller tag for historian and log documents.
fn controller_tag(client: &PacClient) -> String {
    std::env::var("PACLINK_CONTROLLER").unwrap_or_else(|_| client.config().hostname.clone())
}

/// Sink for historize/process-logs: `--url <collector>` or stdout.
fn sink_from_args(args: &[String]) -> anyhow::Result<Arc<dyn NotificationSink>> {
    match args {
        [] => Ok(Arc::new(StdoutSink)),
        [flag, url] if flag.as_str() == "--url" => Ok(Arc::new(HttpSink::new(url.clone()))),
        _ => anyhow::bail!("expected no options or '--url <collector>'"),
    }
}

async fn process_recipes() -> anyhow::Result<()> {
    let client = client()?;
    let dir = std::env::var("PACLINK_RECIPE_DIR").unwrap_or_else(|_| DEFAULT_RECIPE_DIR.into());
    let durability = match std::env::var("PACLINK_SYNC_WRITES") {
        Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => WriteDurability::Synchronous,
        _ => WriteDurability::Background,
    };

    let preserver = RecipePreserver::new(client, Arc::new(FsRecipeFileStore::new(dir)))
        .with_config(PreserverConfig { durability });

    match preserver.process().await? {
        ProcessOutcome::Saved { written } => {
            println!("saved {written} recipe variables");
        }
        ProcessOutcome::Restored { restored, missing } if missing.is_empty() => {
            println!("restored {restored} recipe variables");
        }
        ProcessOutcome::Restored { restored, missing } => {
            println!(
                "restored {restored} recipe variables; {} missing backups:",
                missing.len()
            );
            for name in missing {
                println!("  {name}");
            }
        }
        ProcessOutcome::Idle { status } => match status {
            Some(status) => println!("no work pending (status: {status})"),
            None => println!("no work pending (unrecognized status value)"),
        },
    }
    Ok(())
}

async fn historize(args: &[String]) -> anyhow::Result<()> {
    let client = client()?;
    let controller = controller_tag(&client);
    let sink = sink_from_args(args)?;

    let historian = Historian::new(client, sink, HistorianConfig::new(controller));
    let points = historian.historize().await?;
    println!("historized {points} points");
    Ok(())
}

async fn process_logs(args: &[String]) -> anyhow::Result<()> {
    let client = client()?;
    let controller = controller_tag(&client);
    let sink = sink_from_args(args)?;

    let dispatcher = LogDispatcher::new(client, sink, LogConfig::new(controller));
    let dispatched = dispatcher.process_logs().await?;
    println!("dispatched {dispatched} log documents");
    Ok(())
}

async fn find(args: &[String]) -> anyhow::Result<()> {
    let [kind, pattern] = args else {
        anyhow::bail!("usage: paclink-ctl find <kind> <regex>");
    };
    let kind = VarKind::from_str(kind)
        .ok_or_else(|| anyhow::anyhow!("unknown kind '{kind}', see paclink-ctl help"))?;
    let pattern = regex::Regex::new(pattern)?;

    let client = client()?;
    let hits = find_matching(client.as_ref(), kind, &pattern).await?;
    let matches: Vec<serde_json::Value> = hits
        .into_iter()
        .map(|hit| serde_json::json!({ "name": hit.variable.raw, "value": hit.value }))
        .collect();
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

async fn get(args: &[String]) -> anyhow::Result<()> {
    let [name] = args else {
        anyhow::bail!("usage: paclink-ctl get <name>");
    };
    let client = client()?;
    let value = client.get_variable(name).await?;
    println!("{}", serde_json::to_string(&value)?);
    Ok(())
}

async fn set(args: &[String]) -> anyhow::Result<()> {
    let [name, raw] = args else {
        anyhow::bail!("usage: paclink-ctl set <name> <json-value>");
    };
    let value: VarValue = serde_json::from_str(raw)
        .map_err(|err| anyhow::anyhow!("value must be a JSON scalar or array: {err}"))?;
    let client = client()?;
    client.set_variable(name, value).await?;
    println!("ok");
    Ok(())
}

async fn device() -> anyhow::Result<()> {
    let client = client()?;
    println!("{}", serde_json::to_string_pretty(&client.device().await?)?);
    Ok(())
}

async fn strategy() -> anyhow::Result<()> {
    let client = client()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&client.strategy().await?)?
    );
    Ok(())
}
