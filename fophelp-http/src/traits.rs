use std::future::Future;

use http::{Request, Response};

/// An abstract HTTP client.
///
/// Implementations only move bytes; authentication, retries and status
/// handling live in [`FetchApiService`](crate::FetchApiService).
#[trait_variant::make(Send)]
pub trait HttpClient {
    /// Send an HTTP request and return the response.
    fn send_http(
        &self,
        request: Request<Vec<u8>>,
    ) -> impl Future<
        Output = core::result::Result<
            Response<Vec<u8>>,
            Box<dyn std::error::Error + Send + Sync + 'static>,
        >,
    >;
}
