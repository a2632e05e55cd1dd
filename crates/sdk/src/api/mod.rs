mod hooks;
pub mod http;
pub mod response;
mod types;

pub use hooks::RequestHook;
pub use types::{
    ApiResponse, ApiResult, ApiSdkError, ApiVersion, ClientConfig, DEFAULT_TIMEOUT, LwApiError,
};
