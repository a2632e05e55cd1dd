use std::{fmt, sync::Arc, time::Instant};

use base64::{Engine as _, engine::general_purpose};
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{
    hooks::RequestHook,
    types::{ApiResult, ApiSdkError, ClientConfig},
};

/// The API wants every call's arguments under a `params` key.
#[derive(Serialize)]
struct ParamsEnvelope<'a, P: ?Sized> {
    params: &'a P,
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
    hook: Option<Arc<dyn RequestHook>>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut builder = Client::builder().timeout(config.effective_timeout());
        if !config.verify_tls {
            warn!("TLS certificate verification is disabled for {}", config.url);
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.url.trim_end_matches('/').to_string(),
            headers: build_headers(config)?,
            hook: None,
        })
    }

    pub fn set_hook(&mut self, hook: Arc<dyn RequestHook>) {
        self.hook = Some(hook);
    }

    pub fn build_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method.trim_start_matches('/'))
    }

    pub fn encode_params<P>(params: &P) -> ApiResult<Vec<u8>>
    where
        P: Serialize + ?Sized,
    {
        serde_json::to_vec(&ParamsEnvelope { params }).map_err(ApiSdkError::Encode)
    }

    pub async fn post_raw<P>(&self, method: &str, params: &P) -> ApiResult<Vec<u8>>
    where
        P: Serialize + ?Sized,
    {
        let body = Self::encode_params(params)?;
        let url = self.build_url(method);

        let request =
            self.client.post(&url).headers(self.headers.clone()).body(body).build()?;
        let observed = self.hook.as_ref().and_then(|_| request.try_clone());

        if let (Some(hook), Some(observed)) = (&self.hook, &observed) {
            hook.before_request(observed);
        }

        let start = Instant::now();
        let response = self.client.execute(request).await?;
        let elapsed = start.elapsed();

        if let (Some(hook), Some(observed)) = (&self.hook, &observed) {
            hook.after_request(observed, &response, elapsed);
        }

        let status = response.status();
        debug!("POST {} -> {} in {:?}", url, status.as_u16(), elapsed);

        if status != StatusCode::OK {
            return Err(ApiSdkError::HttpStatus { status, url });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}

fn build_headers(config: &ClientConfig) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let credentials = format!("{}:{}", config.username, config.password);
    let encoded = general_purpose::STANDARD.encode(credentials);
    let mut auth = HeaderValue::from_str(&format!("Basic {}", encoded)).map_err(|_| {
        ApiSdkError::Config { field: "lwApi.username", origin: config.origin.clone() }
    })?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Ok(headers)
}
