use anyhow::{Context, Result};
use log::LevelFilter;
use std::convert::TryFrom;
use std::env;
use std::time::Duration;
use structopt::StructOpt;

mod options;

use crate::options::{Config, OdotaOptions};

use odota::{ClientBuilder, Params, Request};

/// A C-like enum that can be cast to `i32` and used as process exit code.
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is used for any `Result::Err` bubbled up to `main()` using the `?` operator.
    #[allow(unused)]
    UnexpectedFailure = 1,
    CallFailure = 2,
}

fn main() -> Result<()> {
    // std::process::exit doesn't guarantee that all destructors will be ran,
    // therefore we wrap "main" code in another function to guarantee that.
    let exit_code = run_main()?;
    std::process::exit(exit_code);
}

fn run_main() -> Result<i32> {
    let mut opts = OdotaOptions::from_args();

    // Load a potentially existing config file and merge it into the config from the CLI
    if let Some(c) = Config::load_from_file(&opts.config_file)? {
        opts.config.merge(c)
    }
    init_logging(opts.config.verbose);

    let params = parse_params(&opts.raw_params)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(&opts.config, &opts.endpoint, params))
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else if verbose {
        builder.filter_module("odota", LevelFilter::Info);
    }
    builder.init();
}

fn parse_params<T: AsRef<str>>(raw: &[T]) -> Result<Params> {
    let mut out = Params::new();
    for pair in raw {
        let parsed = Params::try_from(pair.as_ref())?;
        out.extend(parsed);
    }
    Ok(out)
}

async fn run(cfg: &Config, endpoint: &str, params: Params) -> Result<i32> {
    let mode = cfg.call_mode()?;
    let method = cfg.request_method()?;
    // 0 keeps the library default, which depends on the API key
    let cooldown = match cfg.cooldown {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };

    let mut client = ClientBuilder::default()
        .host(cfg.host.clone())
        .api_key(cfg.api_key.clone())
        .cooldown(cooldown)
        .verbose(cfg.verbose)
        .allow_insecure(!cfg.secure)
        .timeout(Duration::from_secs(cfg.timeout))
        .max_retries(cfg.max_retries)
        .build()
        .context("Cannot set up the OpenDota client")?;

    let request = Request::new(endpoint.trim_start_matches('/'), params, method);
    let outcome = client.try_call(request, mode).await;

    if cfg.verbose {
        eprintln!("\n{}", client.stats());
    }

    match outcome {
        Ok(payload) => {
            let out = if cfg.compact {
                serde_json::to_string(&payload)?
            } else {
                serde_json::to_string_pretty(&payload)?
            };
            println!("{}", out);
        }
        Err(e) => eprintln!("Error: {}", e),
    }

    let exit_code = if client.stats().is_success() {
        ExitCode::Success
    } else {
        ExitCode::CallFailure
    };
    Ok(exit_code as i32)
}
