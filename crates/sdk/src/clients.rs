use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::api::{
    ApiResponse, ApiResult, ClientConfig, RequestHook,
    http::HttpClient,
    response::{decode_into, decode_object},
};

/// A client for the API. Get one with [`Client::new`].
///
/// Cloning is cheap and clones share the same connection pool, so a single client can serve
/// many concurrent tasks.
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    http: HttpClient,
}

impl Client {
    /// Validates `config` and prepares the HTTP transport. Nothing is sent over the network.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> Result<(), lwapi::ApiSdkError> {
    /// let config = lwapi::ClientConfig::new("https://api.liquidweb.com", "admin", "secret");
    /// let client = lwapi::Client::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let http = HttpClient::new(&config)?;
        Ok(Self { config: Arc::new(config), http })
    }

    /// Attach an observer that is told about every request this client sends.
    pub fn with_hook(mut self, hook: impl RequestHook + 'static) -> Self {
        self.http.set_hook(Arc::new(hook));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Call `method` (for example `bleed/asset/details`) and return the decoded JSON object.
    ///
    /// `params` is anything that serializes to the JSON the method expects; it is sent
    /// wrapped as `{"params": ...}`. An `error_class` in the response comes back as
    /// [`ApiSdkError::Api`](crate::ApiSdkError::Api).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: lwapi::Client) -> Result<(), lwapi::ApiSdkError> {
    /// let details = client
    ///     .call("bleed/asset/details", &serde_json::json!({ "uniq_id": "ABC123" }))
    ///     .await?;
    /// println!("{:?}", details.get("domain"));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<P>(&self, method: &str, params: &P) -> ApiResult<Map<String, Value>>
    where
        P: Serialize + ?Sized,
    {
        let body = self.call_raw(method, params).await?;
        decode_object(&body)
    }

    /// Like [`Client::call`] but decodes into `target`.
    ///
    /// If the decoded target reports an application error, that error is returned and
    /// `target` still holds everything the API sent back.
    pub async fn call_into<P, T>(&self, method: &str, params: &P, target: &mut T) -> ApiResult<()>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned + ApiResponse,
    {
        let body = self.call_raw(method, params).await?;
        decode_into(&body, target)
    }

    /// Send the call and return the raw response body.
    ///
    /// Unlike [`Client::call`] the body is not inspected for application errors; callers
    /// have to check for an `error_class` themselves.
    pub async fn call_raw<P>(&self, method: &str, params: &P) -> ApiResult<Vec<u8>>
    where
        P: Serialize + ?Sized,
    {
        self.http.post_raw(method, params).await
    }
}
