//! The transport client: one configured pipeline every call goes through.
//!
//! # Design
//! `HttpClient` owns its config, transport and both interceptors; none of
//! them change after construction and no state is shared between calls.
//! A call is split into three steps, each usable on its own:
//!
//! 1. `build_request` turns method, path, query and body into an
//!    `HttpRequest` (endpoint, default headers, JSON body);
//! 2. the request interceptor and then the transport run;
//! 3. `settle` feeds the outcome to the response interceptor (2xx) or the
//!    error classifier (everything else).
//!
//! `call` chains the three. Construction failures skip step 2 and are
//! settled as "never sent", so they get the same notify-and-reject treatment
//! as wire failures.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::i18n::Locale;
use crate::interceptor::{PassThrough, RequestInterceptor, ResponseInterceptor};
use crate::notify::Notifier;
use crate::transport::Transport;

pub struct HttpClient<T> {
    config: ClientConfig,
    transport: T,
    request_interceptor: Box<dyn RequestInterceptor>,
    response_interceptor: ResponseInterceptor,
}

impl<T: Transport> HttpClient<T> {
    /// Client with a pass-through request interceptor and zh-CN messages.
    pub fn new(config: ClientConfig, transport: T, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            transport,
            request_interceptor: Box::new(PassThrough),
            response_interceptor: ResponseInterceptor::new(Locale::default(), notifier),
        }
    }

    pub fn with_request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptor = Box::new(interceptor);
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.response_interceptor = self.response_interceptor.with_locale(locale);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<&B>,
    ) -> Result<HttpRequest, TransportError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| TransportError::never_sent(format!("serialization failed: {e}")))?;
        Ok(HttpRequest {
            method,
            url: self.config.endpoint(path),
            query,
            headers: vec![("content-type".to_string(), self.config.content_type().to_string())],
            body,
        })
    }

    /// Resolve one exchange: a success envelope, or the error the caller
    /// should see (after notifying, unless the status is 409).
    pub fn settle(
        &self,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<Envelope<Value>, ApiError> {
        match outcome {
            Ok(response) if response.is_success() => self.response_interceptor.on_response(&response),
            Ok(response) => Err(self
                .response_interceptor
                .on_error(TransportError::from_status(response.status, &response.body))),
            Err(error) => Err(self.response_interceptor.on_error(error)),
        }
    }

    pub async fn call<B>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<&B>,
    ) -> Result<Envelope<Value>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let prepared = self
            .build_request(method, path, query, body)
            .and_then(|request| self.intercept(request));
        let outcome = match prepared {
            Ok(request) => {
                log::debug!("{} {}", request.method, request.url);
                self.transport.send(&request).await
            }
            Err(error) => Err(error),
        };
        self.settle(outcome)
    }

    pub async fn get(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Envelope<Value>, ApiError> {
        self.call::<()>(HttpMethod::Get, path, query, None).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Envelope<Value>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.call(HttpMethod::Post, path, Vec::new(), Some(body)).await
    }

    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Envelope<Value>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.call(HttpMethod::Put, path, Vec::new(), Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Envelope<Value>, ApiError> {
        self.call::<()>(HttpMethod::Delete, path, Vec::new(), None).await
    }

    fn intercept(&self, request: HttpRequest) -> Result<HttpRequest, TransportError> {
        self.request_interceptor
            .intercept(request)
            .inspect_err(|err| log::error!("request error: {err}"))
    }
}
