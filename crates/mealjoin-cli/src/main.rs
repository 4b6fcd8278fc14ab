// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod listing;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use listing::ListOptions;
use logging::LogTarget;
use mealjoin_app::{AppState, CollectionKind};
use mealjoin_store::MockStore;
use runtime::StoreRuntime;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `mealjoin --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let interactive = options.list.is_none() && !options.check_only;
    let target = if interactive {
        config
            .log_file()
            .map_or(LogTarget::Discard, LogTarget::File)
    } else {
        LogTarget::Stderr
    };
    logging::init_subscriber(&config.log_level(), target)?;

    let store_options = config.store_options()?;
    let start = config.start_route()?;
    if options.check_only {
        info!(
            config = %options.config_path.display(),
            start = %start.path(),
            "config ok"
        );
        return Ok(());
    }

    let store = Arc::new(MockStore::demo(store_options));
    if let Some(list) = &options.list {
        print!("{}", listing::render_listing(store.as_ref(), list)?);
        return Ok(());
    }

    let mut state = AppState {
        route: start,
        ..AppState::default()
    };
    let runtime = StoreRuntime::new(store, config.toast_duration());
    mealjoin_tui::run_app(&mut state, &runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    list: Option<ListOptions>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        list: None,
    };
    let mut kind = None;
    let mut search = None;
    let mut filter = None;
    let mut sort = None;
    let mut descending = false;
    let mut json = false;
    let mut list_only_flag = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        let mut value_for = |flag: &str, what: &str| -> Result<String> {
            iter.next()
                .map(|value| value.as_ref().to_owned())
                .ok_or_else(|| anyhow!("{flag} requires {what}"))
        };
        match arg {
            "--config" => {
                options.config_path = PathBuf::from(value_for(arg, "a file path")?);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--list" => {
                let raw = value_for(arg, "a collection name")?;
                kind = Some(CollectionKind::parse(raw.trim()).ok_or_else(|| {
                    anyhow!(
                        "unknown collection {raw:?}; expected one of: {}",
                        collection_names()
                    )
                })?);
            }
            "--search" => {
                search = Some(value_for(arg, "a search term")?);
                list_only_flag.get_or_insert("--search");
            }
            "--filter" => {
                filter = Some(value_for(arg, "a filter value")?);
                list_only_flag.get_or_insert("--filter");
            }
            "--sort" => {
                sort = Some(value_for(arg, "a sort key")?);
                list_only_flag.get_or_insert("--sort");
            }
            "--desc" => {
                descending = true;
                list_only_flag.get_or_insert("--desc");
            }
            "--json" => {
                json = true;
                list_only_flag.get_or_insert("--json");
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    match kind {
        Some(kind) => {
            options.list = Some(ListOptions {
                kind,
                search,
                filter,
                sort,
                descending,
                json,
            });
        }
        None => {
            if let Some(flag) = list_only_flag {
                bail!("{flag} only applies to --list <collection>");
            }
        }
    }

    Ok(options)
}

fn collection_names() -> String {
    CollectionKind::ALL
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_help() {
    println!("mealjoin");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and exit");
    println!(
        "  --list <collection>      Print {} and exit",
        collection_names()
    );
    println!("    --search <term>        Keep rows containing the term");
    println!("    --filter <value>       Keep one category or status");
    println!("    --sort <key>           Sort by a key (ascending)");
    println!("    --desc                 Sort descending");
    println!("    --json                 Print JSON instead of a table");
    println!("  --help                   Show this help");
}
