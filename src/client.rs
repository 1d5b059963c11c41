use derive_builder::Builder;
use log::Level;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::{
    classify::classify,
    ratelimit::{default_cooldown, Gate, RateState},
    retry::{should_retry_call, RetryExt},
    stats::DispatchStats,
    transport::{parse_host, HttpTransport, Transport, DEFAULT_HOST},
    CallMode, ErrorKind, Params, Payload, Request, RequestMethod, Result,
};

/// Wait between two attempts of a failed call
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

pub(crate) const USER_AGENT: &str = concat!("odota/", env!("CARGO_PKG_VERSION"));

/// Paced, retrying access to the OpenDota API.
///
/// A client owns its cooldown state: every call takes `&mut self`, so there
/// is exactly one call in flight per client. Share the API between tasks by
/// giving each task its own client, or by putting one behind a mutex.
#[derive(Debug)]
pub struct Client<T = HttpTransport> {
    transport: T,
    state: RateState,
    cooldown: Duration,
    backoff: Duration,
    max_retries: Option<usize>,
    verbose: bool,
    stats: DispatchStats,
}

/// Configuration of a [`Client`].
///
/// All fields are optional; an empty builder talks to the public OpenDota
/// instance without an API key and paces requests one second apart.
#[derive(Builder, Debug)]
#[builder(build_fn(skip))]
#[builder(setter(into))]
#[builder(name = "ClientBuilder")]
pub struct ClientBuilderInternal {
    /// Base URL of the API, `https://api.opendota.com/api/` by default
    host: String,
    /// OpenDota API key, attached to every request
    api_key: Option<String>,
    /// Minimum time between two requests. Defaults to 250ms with an API key
    /// and 1s without one; `Duration::from_secs(0)` disables pacing.
    cooldown: Option<Duration>,
    /// Report progress at `info` instead of `debug` level
    verbose: bool,
    /// Skip TLS certificate verification (on by default)
    allow_insecure: bool,
    /// Network timeout of a single attempt
    timeout: Option<Duration>,
    user_agent: String,
    /// Wait between two attempts of a failed call
    backoff: Duration,
    /// Retries per call in `Safe` and `Force` mode, unbounded if `None`
    max_retries: Option<usize>,
}

impl ClientBuilder {
    /// Build a client talking HTTP to the configured host
    pub fn build(&mut self) -> Result<Client> {
        let host = self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string());
        let api_key = self.api_key.clone().unwrap_or_default();
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| USER_AGENT.to_string());

        let transport = HttpTransport::new(
            parse_host(&host)?,
            api_key,
            self.allow_insecure.unwrap_or(true),
            self.timeout.unwrap_or(None),
            &user_agent,
        )?;

        if self.verbose.unwrap_or(false) {
            info!("Initialised OpenDota client, host: {}", transport.base());
        }
        Ok(self.build_with_transport(transport))
    }

    /// Build a client on top of an arbitrary [`Transport`]
    pub fn build_with_transport<T: Transport>(&mut self, transport: T) -> Client<T> {
        let has_api_key = self
            .api_key
            .clone()
            .unwrap_or_default()
            .map_or(false, |key| !key.is_empty());
        let cooldown = self
            .cooldown
            .unwrap_or(None)
            .unwrap_or_else(|| default_cooldown(has_api_key));

        Client {
            transport,
            state: RateState::new(),
            cooldown,
            backoff: self.backoff.unwrap_or(DEFAULT_BACKOFF),
            max_retries: self.max_retries.unwrap_or(None),
            verbose: self.verbose.unwrap_or(false),
            stats: DispatchStats::new(),
        }
    }
}

impl<T: Transport> Client<T> {
    /// Call `endpoint` and return the decoded payload.
    ///
    /// Every failure, whatever its cause, comes back as `None`; the cause is
    /// logged. Use [`Client::try_call`] to inspect it.
    pub async fn call(
        &mut self,
        endpoint: &str,
        mode: CallMode,
        params: Params,
        method: RequestMethod,
    ) -> Option<Payload> {
        self.try_call(Request::new(endpoint, params, method), mode)
            .await
            .ok()
    }

    /// Send `request` in `mode`, retrying transient failures as the mode
    /// allows.
    ///
    /// `Safe` and `Force` calls retry remote errors, undecodable bodies and
    /// transport failures after a fixed backoff, without limit unless
    /// `max_retries` is configured. `Fast` calls never retry and are
    /// dropped with [`ErrorKind::RateLimited`] while the API cools down.
    /// `NotFound` and `NodeDisabled` are never retried.
    pub async fn try_call(&mut self, request: Request, mode: CallMode) -> Result<Payload> {
        self.report(format_args!(
            "Sending request to /{} ({} mode)",
            request.endpoint, mode
        ));

        let mut attempts = 0;
        loop {
            match self.state.gate(mode, Instant::now(), self.cooldown) {
                Gate::Proceed => {}
                Gate::Wait(delay) => {
                    self.report(format_args!(
                        "Holding on for {}ms (API cooldown)",
                        delay.as_millis()
                    ));
                    sleep(delay).await;
                    self.state.mark_ready();
                }
                Gate::Drop => {
                    self.report(format_args!(
                        "API cooldown. Skipping request to /{}",
                        request.endpoint
                    ));
                    return self.finish(Err(ErrorKind::RateLimited));
                }
            }

            self.state.mark_sent(Instant::now());
            self.stats.record_request();
            attempts += 1;
            let raw = self.transport.send(&request).await;

            let err = match classify(&raw) {
                Ok(payload) => {
                    self.report(format_args!("{}: OK", request));
                    return self.finish(Ok(payload));
                }
                Err(err) => err,
            };

            if should_retry_call(&err, mode, attempts, self.max_retries) {
                self.report(format_args!("{}: {}. Waiting", request, err));
                self.stats.record_retry();
                sleep(self.backoff).await;
                continue;
            }

            let err = if mode.retries_failures() && err.should_retry() {
                ErrorKind::RetriesExhausted {
                    attempts,
                    last: Box::new(err),
                }
            } else {
                err
            };
            self.report(format_args!("{}: {}. Skipping", request, err));
            return self.finish(Err(err));
        }
    }

    fn finish(&mut self, outcome: Result<Payload>) -> Result<Payload> {
        self.stats.record_outcome(&outcome);
        outcome
    }

    /// Refuse a call before it reaches the API
    pub(crate) fn reject(&mut self, reason: &str) -> Option<Payload> {
        warn!("Not sending request: {}", reason);
        self.finish(Err(ErrorKind::InvalidArgument(reason.to_string())))
            .ok()
    }

    fn report(&self, args: std::fmt::Arguments<'_>) {
        let level = if self.verbose {
            Level::Info
        } else {
            Level::Debug
        };
        log!(level, "{}", args);
    }

    /// Minimum time between two requests of this client
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Current pacing state
    pub fn rate_state(&self) -> &RateState {
        &self.state
    }

    /// Counters of the calls made so far
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
