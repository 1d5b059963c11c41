/*!
* `odota` is a paced, retrying client for the [OpenDota API](https://docs.opendota.com/).
*
* The main struct of this crate is [`Client`], configured through
* [`ClientBuilder`]. Every call picks a [`CallMode`]:
*
* - `Safe` waits for the API cooldown, then sends, retrying transient errors
* - `Force` sends right away, retrying transient errors
* - `Fast` sends only if the API is ready and never retries
*
* ```no_run
* use odota::{CallMode, ClientBuilder};
* use std::error::Error;
*
* #[tokio::main]
* async fn main() -> Result<(), Box<dyn Error>> {
*   let mut client = ClientBuilder::default().build()?;
*   if let Some(hero_stats) = client.hero_stats(CallMode::Safe).await {
*     println!("{}", hero_stats);
*   }
*   Ok(())
* }
* ```
*/
#[macro_use]
extern crate log;

mod classify;
mod client;
mod endpoints;
mod error;
mod ratelimit;
mod retry;
mod stats;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use classify::{classify, is_html_document, RawResponse};
pub use client::{Client, ClientBuilder, DEFAULT_BACKOFF};
pub use endpoints::MmrSort;
pub use error::{ErrorKind, Result};
pub use ratelimit::{default_cooldown, RateState, DEFAULT_COOLDOWN, DEFAULT_KEYED_COOLDOWN};
pub use stats::DispatchStats;
pub use transport::{parse_host, HttpTransport, Transport, DEFAULT_HOST};
pub use types::{CallMode, Params, Payload, Request, RequestMethod};
