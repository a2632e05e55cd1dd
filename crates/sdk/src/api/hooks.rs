use std::time::Duration;

use reqwest::{Request, Response};

/// Observes requests sent by a [`Client`](crate::Client).
///
/// Hooks are for logging and metrics. They see the request and response but cannot change
/// what the client does with them. Both methods default to doing nothing.
pub trait RequestHook: Send + Sync {
    fn before_request(&self, _request: &Request) {}

    fn after_request(&self, _request: &Request, _response: &Response, _elapsed: Duration) {}
}

impl<F> RequestHook for F
where
    F: Fn(&Request, &Response, Duration) + Send + Sync,
{
    fn after_request(&self, request: &Request, response: &Response, elapsed: Duration) {
        self(request, response, elapsed)
    }
}
