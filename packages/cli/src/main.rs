//! `ldr` — command-line client for the ldr resolver service.
//!
//! Talks to a running `ldr-server` over HTTP:
//!
//! - **`expand`** / **`compact`** — resolve one or more URLs and print the
//!   result as JSON.
//! - **`health`** — server liveness with cache and mapping counts.
//! - **`mappings`** — inspect or replace the server's URL mapping table.
//! - **`cache`** — inspect or clear the server's result cache.
//!
//! Results go to stdout; cache hit/miss notes and errors go to stderr.

mod client;

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ldr::MappingTable;
use serde::Serialize;

use client::Client;

/// ldr — recursive JSON-LD resolver client
#[derive(Parser, Debug)]
#[command(name = "ldr", version, about, long_about = None)]
struct Cli {
    /// Base URL of the resolver service.
    #[arg(long, env = "LDR_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Do not print cache hit/miss notes.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recursively expand documents.
    ///
    /// Several URLs are processed in order and printed as one JSON array.
    Expand {
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,

        /// How many documents deep to inline references (server default: 2).
        #[arg(short, long)]
        depth: Option<u32>,
    },

    /// Recursively expand, then compact against each document's own context.
    Compact {
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,

        #[arg(short, long)]
        depth: Option<u32>,
    },

    /// Check that the server is up.
    Health,

    /// Inspect or replace the URL mapping table.
    Mappings {
        #[command(subcommand)]
        action: MappingsAction,
    },

    /// Inspect or clear the result cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum MappingsAction {
    /// Print the table in effect.
    Get,
    /// Read a local mapping file and send it to the server.
    Set { file: PathBuf },
    /// Have the server load a mapping file from its own filesystem.
    Load { path: String },
    /// Empty the table.
    Clear,
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    Stats,
    List,
    Clear,
}

#[derive(Clone, Copy)]
enum Op {
    Expand,
    Compact,
}

fn main() {
    let cli = Cli::parse();
    let client = Client::new(&cli.server, Duration::from_secs(cli.timeout))
        .unwrap_or_else(|e| fatal(&e.to_string()));

    match cli.command {
        Command::Expand { urls, depth } => resolve(&client, Op::Expand, &urls, depth, cli.quiet),
        Command::Compact { urls, depth } => resolve(&client, Op::Compact, &urls, depth, cli.quiet),

        Command::Health => print_json(&client.health().unwrap_or_else(|e| fatal(&e.to_string()))),

        Command::Mappings { action } => match action {
            MappingsAction::Get => {
                let resp = client.get_mappings().unwrap_or_else(|e| fatal(&e.to_string()));
                print_json(&resp.mappings);
            }
            MappingsAction::Set { file } => {
                let table = MappingTable::from_file(&file).unwrap_or_else(|e| fatal(&e.to_string()));
                let resp = client
                    .set_mappings(table)
                    .unwrap_or_else(|e| fatal(&e.to_string()));
                eprintln!("{} ({} mappings)", resp.message, resp.count);
            }
            MappingsAction::Load { path } => {
                let resp = client
                    .load_mappings(&path)
                    .unwrap_or_else(|e| fatal(&e.to_string()));
                eprintln!("{} ({} mappings)", resp.message, resp.count);
            }
            MappingsAction::Clear => {
                let resp = client.clear_mappings().unwrap_or_else(|e| fatal(&e.to_string()));
                eprintln!("Mappings cleared: {} removed", resp.cleared);
            }
        },

        Command::Cache { action } => match action {
            CacheAction::Stats => {
                print_json(&client.cache_stats().unwrap_or_else(|e| fatal(&e.to_string())))
            }
            CacheAction::List => {
                print_json(&client.cache_list().unwrap_or_else(|e| fatal(&e.to_string())))
            }
            CacheAction::Clear => {
                let resp = client.cache_clear().unwrap_or_else(|e| fatal(&e.to_string()));
                eprintln!("Cache cleared: {} entries removed", resp.cleared);
            }
        },
    }
}

/// Run `op` for each URL. One URL prints its result; several print an array.
fn resolve(client: &Client, op: Op, urls: &[String], depth: Option<u32>, quiet: bool) {
    let mut results = Vec::with_capacity(urls.len());
    for (i, url) in urls.iter().enumerate() {
        if urls.len() > 1 && !quiet {
            eprintln!("Processing {}/{}: {url}", i + 1, urls.len());
        }
        let resp = match op {
            Op::Expand => client.expand(url, depth),
            Op::Compact => client.compact(url, depth),
        }
        .unwrap_or_else(|e| fatal(&e.to_string()));

        if !quiet {
            let note = if resp.cached { "Cache HIT" } else { "Cache MISS" };
            match depth {
                Some(d) => eprintln!("[{note}] {url} (depth={d})"),
                None => eprintln!("[{note}] {url} (depth=default)"),
            }
        }
        results.push(resp.result);
    }

    if results.len() == 1 {
        print_json(&results[0]);
    } else {
        print_json(&results);
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fatal(&format!("cannot render output: {e}")),
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("ldr: {msg}");
    process::exit(2);
}
