//! Client-side data-access layer for the todo service.
//!
//! # Overview
//! Every call goes through one `HttpClient` pipeline: build the request, run
//! the request interceptor, send it, then normalize what came back. The
//! server wraps bodies in an `{code, message, data}` envelope; a 2xx with
//! `code == 0` resolves to the whole envelope, anything else becomes an
//! `ApiError` and, except for version conflicts (409), a user notification.
//!
//! # Design
//! - `HttpRequest`/`HttpResponse` are plain data; only `Transport`
//!   implementations do I/O, so the pipeline is testable with canned
//!   responses.
//! - Server messages are localized by an ordered `PhraseTable`.
//! - The notification side channel is an injected `Notifier`.
//! - Business errors reach the caller translated; transport errors reach the
//!   caller raw, with the translated text going to the notifier only.
//! - `TodoApi` holds the per-endpoint wrappers.

pub mod classify;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod i18n;
pub mod interceptor;
pub mod notify;
pub mod todos;
pub mod transport;
pub mod types;

pub use client::HttpClient;
pub use config::ClientConfig;
pub use envelope::{Envelope, VersionConflict};
pub use error::{ApiError, ErrorKind, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use i18n::{translate, Locale, Messages, PhraseTable};
pub use interceptor::{PassThrough, RequestInterceptor, ResponseInterceptor};
pub use notify::{LogNotifier, Notifier, RecordingNotifier};
pub use todos::TodoApi;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Category, CreateTodo, ListQuery, SortBy, Todo, UpdateStatus, UpdateTodo};
