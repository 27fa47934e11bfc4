// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::{APP_NAME, Config};
use log::info;
use runtime::{ApiSource, DirectSource};
use std::env;
use std::fs::{self, OpenOptions};
use std::net::SocketAddr;
use std::path::PathBuf;
use tiny_http::Server;
use tracksheet_server::{ApiClient, ProgramsApi};
use tracksheet_sheets::{HttpSheetFetcher, SheetsService};

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
            "load config {}; run `tracksheet --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let timeout = config.source_timeout()?;
    let fetcher = HttpSheetFetcher::new(config.source_url(), timeout).with_context(|| {
        format!(
            "invalid [source] config in {}; fix url/timeout values",
            options.config_path.display()
        )
    })?;
    let service = SheetsService::new(fetcher);

    if options.serve {
        let bind = options
            .bind
            .clone()
            .unwrap_or_else(|| config.bind_addr().to_owned());
        bind.parse::<SocketAddr>()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
        if options.check_only {
            return Ok(());
        }
        init_logging(LogTarget::Stderr)?;
        return serve(&bind, ProgramsApi::new(service));
    }

    let api_url = options
        .api_url
        .clone()
        .or_else(|| config.api_url().map(str::to_owned));
    let api_client = api_url
        .map(|url| {
            ApiClient::new(&url, timeout).with_context(|| format!("invalid endpoint url {url:?}"))
        })
        .transpose()?;
    if options.check_only {
        return Ok(());
    }

    init_logging(LogTarget::File(log_path()?))?;
    match api_client {
        Some(client) => {
            info!("dashboard reading from {}", client.base_url());
            tracksheet_tui::run_app(&ApiSource::new(client))
        }
        None => {
            info!("dashboard reading sheet {}", service.fetcher().url());
            tracksheet_tui::run_app(&DirectSource::new(service))
        }
    }
}

fn serve(bind: &str, api: ProgramsApi<HttpSheetFetcher>) -> Result<()> {
    let server = Server::http(bind).map_err(|error| {
        anyhow!("bind {bind}: {error} -- set [server].bind or pass --bind <addr>")
    })?;
    tracksheet_server::serve(&server, &api)
}

enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn init_logging(target: LogTarget) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let LogTarget::File(path) = target {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init().context("initialize logging")
}

/// The dashboard owns the terminal, so its logs go to a file.
fn log_path() -> Result<PathBuf> {
    let cache_root = dirs::cache_dir().ok_or_else(|| anyhow!("cannot resolve cache directory"))?;
    let log_dir = cache_root.join(APP_NAME);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;
    Ok(log_dir.join(format!("{APP_NAME}.log")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    serve: bool,
    bind: Option<String>,
    api_url: Option<String>,
    check_only: bool,
    show_help: bool,
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
        serve: false,
        bind: None,
        api_url: None,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--serve" => {
                options.serve = true;
            }
            "--bind" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--bind requires an address like 127.0.0.1:3000"))?;
                options.bind = Some(value.as_ref().to_owned());
            }
            "--api" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--api requires an endpoint url"))?;
                options.api_url = Some(value.as_ref().to_owned());
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    if options.serve && options.api_url.is_some() {
        return Err(anyhow!(
            "--api reads from an endpoint and cannot be combined with --serve"
        ));
    }

    Ok(options)
}

fn print_help() {
    println!("tracksheet: program tracking dashboard");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --serve                  Serve GET /api/programs instead of the dashboard");
    println!("  --bind <addr>            Address for --serve (default from [server].bind)");
    println!("  --api <url>              Dashboard reads through a running endpoint");
    println!("  --check                  Validate config and clients, then exit");
    println!("  --help                   Show this help");
}
