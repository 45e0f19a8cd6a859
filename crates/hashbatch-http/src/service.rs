//! hashbatch HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use hyper::body::Incoming;

use crate::dispatch::{BatchHandler, dispatch_batch};
use crate::response::{
    HashResponseBody, REQUEST_ID_HEADER, error_to_response, health_response, json_response,
    status_response,
};
use crate::router::{Route, resolve_route};

/// Configuration for the hashbatch HTTP service.
#[derive(Debug, Clone)]
pub struct HashHttpConfig {
    /// Path of the hashing endpoint.
    pub endpoint_path: String,
}

impl Default for HashHttpConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/foo".to_owned(),
        }
    }
}

/// Hyper `Service` implementation for the batch hashing endpoint.
///
/// Wraps a [`BatchHandler`] implementation and routes incoming HTTP
/// requests to it.
#[derive(Debug)]
pub struct HashHttpService<H: BatchHandler> {
    handler: Arc<H>,
    config: Arc<HashHttpConfig>,
}

impl<H: BatchHandler> HashHttpService<H> {
    /// Create a new `HashHttpService`.
    pub fn new(handler: Arc<H>, config: HashHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }
}

impl<H: BatchHandler> Clone for HashHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: BatchHandler> hyper::service::Service<http::Request<Incoming>> for HashHttpService<H> {
    type Response = http::Response<HashResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, handler.as_ref(), &config, &request_id).await;
            let response = add_common_headers(response, &request_id);
            Ok(response)
        })
    }
}

/// Process a single HTTP request through the full pipeline.
///
/// Generic over the request body so the pipeline can be driven without a
/// live connection.
pub async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    config: &HashHttpConfig,
    request_id: &str,
) -> http::Response<HashResponseBody>
where
    H: BatchHandler,
    B: http_body::Body<Data = Bytes> + Send + Unpin + 'static,
    B::Error: std::fmt::Display + Send,
{
    let (parts, body) = req.into_parts();
    let route = resolve_route(&parts.method, parts.uri.path(), &config.endpoint_path);

    match route {
        Route::HashBatch => match dispatch_batch(handler, body).await {
            Ok(json) => json_response(json, request_id),
            Err(err) => {
                tracing::warn!(
                    request_id,
                    code = %err.code,
                    error = %err,
                    "hash batch request failed",
                );
                error_to_response(&err, request_id)
            }
        },
        Route::Health => health_response(&handler.health(), request_id),
        Route::MethodNotAllowed | Route::NotFound => {
            tracing::debug!(
                method = %parts.method,
                path = parts.uri.path(),
                %route,
                "rejected request",
            );
            let status = if route == Route::NotFound {
                http::StatusCode::NOT_FOUND
            } else {
                http::StatusCode::METHOD_NOT_ALLOWED
            };
            status_response(status, request_id)
        }
    }
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<HashResponseBody>,
    request_id: &str,
) -> http::Response<HashResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry(REQUEST_ID_HEADER).or_insert(hv);
    }

    headers.insert("server", http::HeaderValue::from_static("hashbatch"));

    response
}
