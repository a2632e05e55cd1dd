//! A minimalist client for LiquidWeb's JSON API.
//!
//! Every call is an HTTP POST to `{url}/{method}` with basic authentication and a body of
//! `{"params": ...}`. The API has two trees: `v1` for long term compatibility and `bleed` for
//! the latest features (see [`ApiVersion`]).
//!
//! ```no_run
//! use lwapi::{Client, config};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(config::read("lwapi.yaml".as_ref())?)?;
//! let details = client.call("bleed/asset/details", &json!({ "uniq_id": "ABC123" })).await?;
//! println!("{details:?}");
//! # Ok(())
//! # }
//! ```

mod api;
mod clients;
pub mod config;
pub mod logger;

pub use api::{
    ApiResponse, ApiResult, ApiSdkError, ApiVersion, ClientConfig, DEFAULT_TIMEOUT, LwApiError,
    RequestHook,
};
pub use clients::Client;
pub use config::ReadConfigError;
pub use logger::{setup_info_logger, setup_logger};
