/// Cache-suppression headers
///
/// Read and patch responses carry user data that must not be stored by
/// browsers or intermediaries. [`NoCacheLayer`] adds
///
/// - `Cache-Control: no-store, no-cache, must-revalidate`
/// - `Pragma: no-cache`
///
/// to every response whose request method is `GET` or `PATCH`. Responses to
/// other methods pass through untouched.
///
/// # Example
///
/// ```no_run
/// use axum::Router;
/// use todoback_api::middleware::security::NoCacheLayer;
///
/// let app: Router = Router::new().layer(NoCacheLayer);
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

const CACHE_CONTROL_VALUE: &str = "no-store, no-cache, must-revalidate";
const PRAGMA_VALUE: &str = "no-cache";

/// Layer adding cache-suppression headers to GET and PATCH responses
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCacheLayer;

impl<S> Layer<S> for NoCacheLayer {
    type Service = NoCacheMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        NoCacheMiddleware { inner }
    }
}

/// Service produced by [`NoCacheLayer`]
#[derive(Debug, Clone)]
pub struct NoCacheMiddleware<S> {
    inner: S,
}

fn wants_no_cache(method: &Method) -> bool {
    method == Method::GET || method == Method::PATCH
}

impl<S> Service<Request> for NoCacheMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let no_cache = wants_no_cache(request.method());
        let future = self.inner.call(request);

        Box::pin(async move {
            let mut response = future.await?;

            if no_cache {
                let headers = response.headers_mut();
                headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
                headers.insert(header::PRAGMA, HeaderValue::from_static(PRAGMA_VALUE));
            }

            Ok(response)
        })
    }
}
