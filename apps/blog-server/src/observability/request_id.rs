//! Request ID middleware - tags each request with a correlation id.

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the request ID, in and out.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest client-supplied ID we echo back.
const MAX_INCOMING_LEN: usize = 128;

/// Correlation id stored in the request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reuse the client's (or load balancer's) id when it is sane.
    fn for_request(req: &ServiceRequest) -> Self {
        let incoming = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty() && v.len() <= MAX_INCOMING_LEN);

        match incoming {
            Some(id) => Self(id.to_string()),
            None => Self(Uuid::new_v4().to_string()),
        }
    }
}

/// Middleware that assigns a request ID, records it on a span around the
/// rest of the chain and echoes it in the `X-Request-ID` response header.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::for_request(&req);
        let header_value = HeaderValue::from_str(request_id.as_str())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"));

        let span = tracing::info_span!("request", request_id = %request_id.as_str());
        req.extensions_mut().insert(request_id);

        let fut = span.in_scope(|| self.service.call(req));

        Box::pin(
            async move {
                let mut res = fut.await?;
                res.headers_mut()
                    .insert(REQUEST_ID_HEADER.clone(), header_value);
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn test_generates_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let id = res.headers().get(&REQUEST_ID_HEADER).expect("header");
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[actix_web::test]
    async fn test_echoes_incoming_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Request-ID", "lb-1234"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.headers().get(&REQUEST_ID_HEADER).unwrap(), "lb-1234");
    }
}
