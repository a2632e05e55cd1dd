use std::{fmt, time::Duration};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timeout used when none (or zero) is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const INLINE_ORIGIN: &str = "<inline>";

/// Connection settings for a [`Client`](crate::Client).
///
/// Built directly with [`ClientConfig::new`] or loaded through [`crate::config`]. Nothing is
/// checked until the client is constructed.
#[derive(Clone)]
pub struct ClientConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub timeout: Option<Duration>,
    pub verify_tls: bool,
    /// Where these settings came from, used when reporting missing fields.
    pub origin: String,
}

impl ClientConfig {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            timeout: None,
            verify_tls: true,
            origin: INLINE_ORIGIN.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disabling verification accepts any server certificate. Only meant for lab setups.
    pub fn with_tls_verification(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// The timeout actually applied to requests.
    pub fn effective_timeout(&self) -> Duration {
        match self.timeout {
            Some(timeout) if !timeout.is_zero() => timeout,
            _ => DEFAULT_TIMEOUT,
        }
    }

    pub(crate) fn validate(&self) -> ApiResult<()> {
        let required = [
            ("lwApi.username", &self.username),
            ("lwApi.password", &self.password),
            ("lwApi.url", &self.url),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ApiSdkError::Config { field, origin: self.origin.clone() });
            }
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .field("origin", &self.origin)
            .finish()
    }
}

/// An error reported by the API itself inside a successful HTTP response.
///
/// Embed it in your own response structs with `#[serde(flatten)]` so that
/// [`Client::call_into`](crate::Client::call_into) can tell whether the call failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LwApiError {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error_class: String,
    #[serde(default, rename = "error", skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_message: String,
}

impl LwApiError {
    pub fn had_error(&self) -> bool {
        !self.error_class.is_empty()
    }
}

impl fmt::Display for LwApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_class, self.full_message)
    }
}

impl std::error::Error for LwApiError {}

/// Implemented by anything [`Client::call_into`](crate::Client::call_into) can decode into.
pub trait ApiResponse {
    /// The application error carried by this response, if any.
    fn api_error(&self) -> Option<LwApiError>;
}

impl ApiResponse for LwApiError {
    fn api_error(&self) -> Option<LwApiError> {
        self.had_error().then(|| self.clone())
    }
}

/// Implements [`ApiResponse`] for a struct that embeds an [`LwApiError`] field.
///
/// ```
/// use lwapi::{LwApiError, impl_api_response};
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Deserialize)]
/// struct AssetDetails {
///     #[serde(flatten)]
///     error: LwApiError,
///     uniq_id: Option<String>,
/// }
///
/// impl_api_response!(AssetDetails, error);
/// ```
#[macro_export]
macro_rules! impl_api_response {
    ($ty:ty, $field:ident) => {
        impl $crate::ApiResponse for $ty {
            fn api_error(&self) -> ::std::option::Option<$crate::LwApiError> {
                $crate::ApiResponse::api_error(&self.$field)
            }
        }
    };
}

/// The two API trees exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Long term compatibility.
    V1,
    /// Latest features, may change.
    Bleed,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::Bleed => "bleed",
        }
    }

    /// Prefix a method such as `asset/details` with this version.
    pub fn path(&self, method: &str) -> String {
        format!("{}/{}", self.as_str(), method.trim_start_matches('/'))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ApiSdkError {
    #[error("{field} is missing from config [{origin}]")]
    Config { field: &'static str, origin: String },

    #[error("Failed to encode request params: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Bad HTTP response code [{}] from [{url}]", .status.as_u16())]
    HttpStatus { status: StatusCode, url: String },

    #[error("Unexpected response from the API: {0}")]
    Decode(String),

    #[error(transparent)]
    Api(LwApiError),
}

impl ApiSdkError {
    pub fn is_api_error(&self) -> bool {
        matches!(self, ApiSdkError::Api(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, ApiSdkError::Transport(_) | ApiSdkError::HttpStatus { .. })
    }

    pub fn api_error(&self) -> Option<&LwApiError> {
        match self {
            ApiSdkError::Api(error) => Some(error),
            _ => None,
        }
    }

    /// The HTTP status of a non-200 response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiSdkError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<LwApiError> for ApiSdkError {
    fn from(error: LwApiError) -> Self {
        ApiSdkError::Api(error)
    }
}

pub type ApiResult<T> = Result<T, ApiSdkError>;
