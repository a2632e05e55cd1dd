//! Looks up an asset and a zone.
//!
//! ```bash
//! LWAPI_USERNAME=me LWAPI_PASSWORD=secret cargo run --example zone_details -- lwapi.yaml ABC123
//! ```

use std::{env, path::PathBuf};

use anyhow::Context;
use lwapi::{ApiVersion, Client, LwApiError, config, impl_api_response, setup_info_logger};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[allow(dead_code)]
#[derive(Debug, Default, Deserialize)]
struct ZoneDetails {
    #[serde(flatten)]
    error: LwApiError,
    #[serde(rename = "availability_zone", default)]
    avl_zone: String,
    #[serde(rename = "description", default)]
    desc: String,
    #[serde(rename = "gateway_devices", default)]
    gateway_devs: Vec<String>,
    #[serde(default)]
    hv_type: String,
    #[serde(default)]
    id: u64,
    #[serde(default)]
    legacy: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: String,
    #[serde(rename = "valid_source_hvs", default)]
    source_hvs: Vec<String>,
}

impl_api_response!(ZoneDetails, error);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_info_logger();

    let mut args = env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| "lwapi.yaml".to_string()));
    let uniq_id = args.next().unwrap_or_else(|| "SJ9NG6".to_string());

    if let Some(dir) = config_path.parent() {
        config::load_dotenv(dir);
    }

    let config = if config_path.exists() {
        config::read(&config_path)
    } else {
        config::from_env()
    }
    .context("loading lwapi config")?;

    let client = Client::new(config)?;

    let asset = client
        .call(&ApiVersion::Bleed.path("asset/details"), &json!({ "uniq_id": uniq_id }))
        .await?;
    info!("asset details: {:?}", asset);

    let mut zone = ZoneDetails::default();
    client.call_into("network/zone/details", &json!({ "id": 1 }), &mut zone).await?;
    info!("zone {} ({}) is {}", zone.name, zone.avl_zone, zone.status);
    println!("{:#?}", zone);

    Ok(())
}
