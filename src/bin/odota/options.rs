use anyhow::{Error, Result};
use lazy_static::lazy_static;
use odota::{CallMode, RequestMethod};
use std::convert::TryFrom;
use serde::Deserialize;
use std::{fs, io::ErrorKind};
use structopt::StructOpt;

const HOST: &str = odota::DEFAULT_HOST;
const MODE: &str = "safe";
const METHOD: &str = "get";
const TIMEOUT: u64 = 20;
const COOLDOWN: u64 = 0;

// this exists because structopt requires `&str` type values for defaults
// (we can't use e.g. `TIMEOUT` or `timeout()` which gets created for serde)
lazy_static! {
    static ref TIMEOUT_STR: String = TIMEOUT.to_string();
    static ref COOLDOWN_STR: String = COOLDOWN.to_string();
}

// Macro for generating default functions to be used by serde
macro_rules! default_function {
    ( $( $name:ident : $T:ty = $e:expr; )* ) => {
        $(
            fn $name() -> $T {
                $e
            }
        )*
    };
}

// Generate the functions for serde defaults
default_function! {
    host: String = HOST.to_string();
    mode: String = MODE.to_string();
    method: String = METHOD.to_string();
    timeout: u64 = TIMEOUT;
    cooldown: u64 = COOLDOWN;
}

// Macro for merging configuration values
macro_rules! fold_in {
    ( $cli:ident , $toml:ident ; $( $key:ident : $default:expr; )* ) => {
        $(
            if $cli.$key == $default && $toml.$key != $default {
                $cli.$key = $toml.$key;
            }
        )*
    };
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "odota",
    about = "Query the OpenDota API, one paced call at a time.\n\nAPI documentation: https://docs.opendota.com/"
)]
pub(crate) struct OdotaOptions {
    /// Endpoint path relative to the API host, e.g. `heroStats` or
    /// `players/86745912/wl`
    #[structopt(name = "endpoint")]
    pub endpoint: String,

    /// Query (or, with `--method post`, form) parameters as `key=value`.
    /// A bare `key` is sent with an empty value.
    #[structopt(name = "params")]
    pub raw_params: Vec<String>,

    /// Configuration file to use
    #[structopt(short, long = "config", default_value = "./odota.toml")]
    pub config_file: String,

    #[structopt(flatten)]
    pub config: Config,
}

#[derive(Debug, Deserialize, StructOpt)]
pub struct Config {
    /// Verbose program output
    #[structopt(short, long)]
    #[serde(default)]
    pub verbose: bool,

    /// Base URL of the API
    #[structopt(long, default_value = HOST)]
    #[serde(default = "host")]
    pub host: String,

    /// OpenDota API key
    #[structopt(long, env = "ODOTA_API_KEY", hide_env_values = true)]
    #[serde(default)]
    pub api_key: Option<String>,

    /// Minimum milliseconds between two requests.
    /// 0 picks the default: 250 with an API key, 1000 without
    #[structopt(long, default_value = &COOLDOWN_STR)]
    #[serde(default = "cooldown")]
    pub cooldown: u64,

    /// Call mode: `safe` waits for the cooldown, `force` ignores it,
    /// `fast` drops the call if the API is not ready
    #[structopt(short, long, default_value = MODE)]
    #[serde(default = "mode")]
    pub mode: String,

    /// Request method: `get` sends the parameters as a query string,
    /// `post` as a form body
    #[structopt(short = "X", long, default_value = METHOD)]
    #[serde(default = "method")]
    pub method: String,

    /// Network timeout of a single attempt, in seconds
    #[structopt(short, long, default_value = &TIMEOUT_STR)]
    #[serde(default = "timeout")]
    pub timeout: u64,

    /// Give up after this many retries (retries forever by default)
    #[structopt(long)]
    #[serde(default)]
    pub max_retries: Option<usize>,

    /// Verify TLS certificates of the API host
    #[structopt(long)]
    #[serde(default)]
    pub secure: bool,

    /// Print the response on a single line
    #[structopt(long)]
    #[serde(default)]
    pub compact: bool,
}

impl Config {
    /// Load configuration from a file
    pub(crate) fn load_from_file(path: &str) -> Result<Option<Config>> {
        // Read configuration file
        let result = fs::read(path);

        // Ignore a file not found error
        let contents = match result {
            Ok(c) => c,
            Err(e) => {
                return match e.kind() {
                    ErrorKind::NotFound => Ok(None),
                    _ => Err(Error::from(e)),
                }
            }
        };

        Ok(Some(toml::from_slice(&contents)?))
    }

    /// Merge the configuration from TOML into the CLI configuration
    pub(crate) fn merge(&mut self, toml: Config) {
        fold_in! {
            // Destination and source configs
            self, toml;

            // Keys with defaults to assign
            verbose: false;
            host: HOST;
            api_key: None;
            cooldown: COOLDOWN;
            mode: MODE;
            method: METHOD;
            timeout: TIMEOUT;
            max_retries: None;
            secure: false;
            compact: false;
        }
    }

    pub(crate) fn call_mode(&self) -> Result<CallMode> {
        Ok(self.mode.parse::<CallMode>()?)
    }

    pub(crate) fn request_method(&self) -> Result<RequestMethod> {
        Ok(RequestMethod::try_from(self.method.clone())?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn cli_config(args: &[&str]) -> Config {
        let mut argv = vec!["odota", "heroes"];
        argv.extend_from_slice(args);
        OdotaOptions::from_iter(argv).config
    }

    #[test]
    fn test_merge_prefers_cli_values() {
        let mut cfg = cli_config(&["--cooldown", "300"]);
        let toml: Config = toml::from_str(
            r#"
            cooldown = 700
            mode = "fast"
            api_key = "from-file"
            "#,
        )
        .unwrap();
        cfg.merge(toml);

        assert_eq!(cfg.cooldown, 300);
        assert_eq!(cfg.mode, "fast");
        assert_eq!(cfg.api_key.as_deref(), Some("from-file"));
        assert_eq!(cfg.host, HOST);
    }

    #[test]
    fn test_load_missing_file() {
        let cfg = Config::load_from_file("./definitely-not-here.toml").unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "verbose = true\nmax_retries = 3").unwrap();

        let cfg = Config::load_from_file(file.path().to_str().unwrap())
            .unwrap()
            .unwrap();
        assert!(cfg.verbose);
        assert_eq!(cfg.max_retries, Some(3));
        assert_eq!(cfg.timeout, TIMEOUT);
    }

    #[test]
    fn test_call_mode() {
        assert_eq!(cli_config(&[]).call_mode().unwrap(), CallMode::Safe);
        assert_eq!(
            cli_config(&["--mode", "fast"]).call_mode().unwrap(),
            CallMode::Fast
        );
        assert!(cli_config(&["--mode", "eventually"]).call_mode().is_err());
    }

    #[test]
    fn test_request_method() {
        assert_eq!(
            cli_config(&[]).request_method().unwrap(),
            RequestMethod::Get
        );
        assert_eq!(
            cli_config(&["-X", "POST"]).request_method().unwrap(),
            RequestMethod::Post
        );
        assert!(cli_config(&["--method", "head"]).request_method().is_err());
    }

    #[test]
    fn test_merge_method_from_file() {
        let mut cfg = cli_config(&[]);
        cfg.merge(toml::from_str(r#"method = "post""#).unwrap());
        assert_eq!(cfg.request_method().unwrap(), RequestMethod::Post);
    }
}
