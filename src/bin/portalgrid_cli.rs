//! CLI tool for portalgrid - shapes exported JSON records offline
//!
//! Usage:
//!   portalgrid_cli layout <grid.json>                 # Positioned cells as JSON
//!   portalgrid_cli pager <current> <total>            # Pager slots as JSON
//!   portalgrid_cli export <records.json> [--type T] [--hidden a,b] [--url URL]
//!   portalgrid_cli groups <files.json> [--page-size N]
//!
//! Add `-v` anywhere for debug logging on stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use indexmap::IndexSet;
use serde::Serialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::fs;
use std::io::{self, Write};

use portalgrid::columns::{generate_tsv_export, CollectionColumn};
use portalgrid::files::{generate_file_groups, grouped_file_count, GroupPaginator};
use portalgrid::layout::render_grid;
use portalgrid::pager::{PageSlot, PagerState};
use portalgrid::{collection_type, GridError, Record, Result, Row};

const USAGE: &str = "Usage: portalgrid_cli <layout|pager|export|groups> ... [-v]";
const DEFAULT_URL: &str = "http://localhost/";

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .map_err(|e| GridError::InvalidInput(format!("reading {path}: {e}")))?;
    Ok(serde_json::from_str(&text)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    io::stdout().write_all(json.as_bytes()).unwrap();
    println!();
    Ok(())
}

/// Value following `flag`, if the flag is present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn cmd_layout(args: &[String]) -> Result<()> {
    let path = args.first().ok_or("layout needs a grid file")?;
    let rows: Vec<Row> = read_json(path)?;
    print_json(&render_grid(&rows, &serde_json::Value::Null))
}

fn cmd_pager(args: &[String]) -> Result<()> {
    let [current, total, ..] = args else {
        return Err("pager needs <current> <total>".into());
    };
    let current: u32 = current.parse().map_err(|_| "current page must be a number")?;
    let total: u32 = total.parse().map_err(|_| "total pages must be a number")?;
    let state = PagerState::new(current, total)?;

    let slots: Vec<String> = state
        .slots()
        .iter()
        .map(|slot| match slot {
            PageSlot::Page {
                number,
                is_current: true,
            } => format!("[{number}]"),
            PageSlot::Page { number, .. } => number.to_string(),
            PageSlot::Ellipsis { .. } => "…".to_string(),
        })
        .collect();
    eprintln!("< {} >", slots.join(" "));
    print_json(&state.model())
}

fn cmd_export(args: &[String]) -> Result<()> {
    let path = args.first().ok_or("export needs a records file")?;
    let records: Vec<Record> = read_json(path)?;

    // One column per property, in first-seen order
    let ids: IndexSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();
    let columns: Vec<CollectionColumn> = ids
        .into_iter()
        .map(|id| CollectionColumn::new(id, id))
        .collect();

    let kind = flag_value(args, "--type").map_or_else(|| collection_type(&records), str::to_string);
    let hidden: Vec<String> = flag_value(args, "--hidden")
        .map(|list| list.split(',').map(str::to_string).collect())
        .unwrap_or_default();
    let url = flag_value(args, "--url").unwrap_or(DEFAULT_URL);

    let export = generate_tsv_export(&records, &columns, &hidden, &kind, url)?;
    eprintln!("Filename: {}", export.filename);
    io::stdout().write_all(export.content.as_bytes()).unwrap();
    println!();
    Ok(())
}

fn cmd_groups(args: &[String]) -> Result<()> {
    let path = args.first().ok_or("groups needs a files file")?;
    let page_size = match flag_value(args, "--page-size") {
        Some(n) => n.parse().map_err(|_| "page size must be a number")?,
        None => portalgrid::files::SEQUENCING_FILES_PER_PAGE,
    };
    let files: Vec<Record> = read_json(path)?;
    let groups = generate_file_groups(&files);
    let pages = GroupPaginator::default().paginate(&groups, page_size);
    eprintln!(
        "{} of {} file(s) in {} group(s) across {} page(s)",
        grouped_file_count(&groups),
        files.len(),
        groups.len(),
        pages.len()
    );
    print_json(pages.as_slice())
}

fn run(args: &[String]) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        return Err(USAGE.into());
    };
    match command.as_str() {
        "layout" => cmd_layout(rest),
        "pager" => cmd_pager(rest),
        "export" => cmd_export(rest),
        "groups" => cmd_groups(rest),
        _ => Err(USAGE.into()),
    }
}

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "-v");
    args.retain(|a| a != "-v");

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .expect("Failed to initialize logger");

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
