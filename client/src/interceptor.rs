//! Pre-send and post-receive stages of the request pipeline.
//!
//! # Design
//! `HttpClient` runs one `RequestInterceptor` before handing a request to the
//! transport and one `ResponseInterceptor` on whatever comes back. Both are
//! fixed when the client is built.
//!
//! The two failure paths surface errors differently. A business failure
//! (`code != 0`) is returned to the caller with its translated message. A
//! transport failure is returned raw; its translated text only goes to the
//! notifier.

use std::sync::Arc;

use serde_json::Value;

use crate::classify::{classify, Notice};
use crate::envelope::Envelope;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::i18n::Locale;
use crate::notify::Notifier;

/// Hook run on every outgoing request.
///
/// This is where cross-cutting request concerns belong, for example adding
/// an `Authorization` header. Returning `Err` aborts the call; the error is
/// then classified as never sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: HttpRequest) -> Result<HttpRequest, TransportError>;
}

/// Forwards requests untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl RequestInterceptor for PassThrough {
    fn intercept(&self, request: HttpRequest) -> Result<HttpRequest, TransportError> {
        Ok(request)
    }
}

impl<F> RequestInterceptor for F
where
    F: Fn(HttpRequest) -> Result<HttpRequest, TransportError> + Send + Sync,
{
    fn intercept(&self, request: HttpRequest) -> Result<HttpRequest, TransportError> {
        self(request)
    }
}

/// Turns settled exchanges into call results, notifying the user on the way.
pub struct ResponseInterceptor {
    locale: Locale,
    notifier: Arc<dyn Notifier>,
}

impl ResponseInterceptor {
    pub fn new(locale: Locale, notifier: Arc<dyn Notifier>) -> Self {
        Self { locale, notifier }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn with_locale(self, locale: Locale) -> Self {
        Self { locale, ..self }
    }

    /// Handle a 2xx response. A success envelope is returned whole; callers
    /// unwrap `data` themselves.
    ///
    /// The body is read loosely: success means `code` is numerically zero
    /// (`0` and `0.0` alike). Anything else is a business failure, and its
    /// string `message` is surfaced even when `code` is missing or mistyped.
    pub fn on_response(&self, response: &HttpResponse) -> Result<Envelope<Value>, ApiError> {
        let mut body = match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => body,
            Err(err) => {
                log::debug!("2xx body is not JSON: {err}");
                return Err(self.reject_business(None, None));
            }
        };
        let message = body.get("message").and_then(Value::as_str).map(str::to_string);
        let code = body.get("code");
        let success = code.and_then(Value::as_f64) == Some(0.0);
        let code = code.and_then(Value::as_i64);
        if success {
            let data = body
                .get_mut("data")
                .map(Value::take)
                .filter(|data| !data.is_null());
            return Ok(Envelope {
                code: 0,
                message,
                data,
            });
        }
        Err(self.reject_business(code, message.as_deref()))
    }

    /// Handle a transport failure. The returned error wraps `error`
    /// unchanged.
    pub fn on_error(&self, error: TransportError) -> ApiError {
        log::error!("response error: {error}");
        match classify(&error, &self.locale) {
            Notice::Show(text) => self.notifier.error(&text),
            Notice::Suppress => {
                log::debug!("notification suppressed for status {:?}", error.status());
            }
        }
        ApiError::Transport(error)
    }

    fn reject_business(&self, code: Option<i64>, message: Option<&str>) -> ApiError {
        let message = self
            .locale
            .translate_or(message, &self.locale.messages.request_failed);
        self.notifier.error(&message);
        ApiError::Business { code, message }
    }
}
