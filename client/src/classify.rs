//! Chooses the notification for a failed HTTP exchange.
//!
//! Branches, in priority order:
//!
//! | failure                      | notification                              |
//! |------------------------------|-------------------------------------------|
//! | status 400                   | translated body message, else bad request |
//! | status 404                   | translated body message, else not found   |
//! | status 409                   | none                                      |
//! | status 500                   | server error (never translated)           |
//! | other status                 | translated body message, else `请求失败 (N)` |
//! | sent, no response            | network failure                           |
//! | never sent                   | the error's own message, else request failed |
//!
//! Classification is pure; `ResponseInterceptor::on_error` does the
//! notifying.

use crate::error::TransportError;
use crate::i18n::Locale;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Show(String),
    /// Leave the failure to the caller without telling the user.
    Suppress,
}

pub fn classify(error: &TransportError, locale: &Locale) -> Notice {
    let messages = &locale.messages;
    match error {
        TransportError::Status { status, .. } => {
            let body_message = error.body_message();
            let text = match *status {
                400 => locale.translate_or(body_message, &messages.bad_request),
                404 => locale.translate_or(body_message, &messages.not_found),
                409 => return Notice::Suppress,
                500 => messages.server_error.clone(),
                other => locale.translate_or(body_message, &messages.status_failed(other)),
            };
            Notice::Show(text)
        }
        TransportError::NoResponse { .. } => Notice::Show(messages.network_failure.clone()),
        TransportError::NeverSent { message } if !message.is_empty() => {
            Notice::Show(message.clone())
        }
        TransportError::NeverSent { .. } => Notice::Show(messages.request_failed.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(text: &str) -> Notice {
        Notice::Show(text.to_string())
    }

    fn status(code: u16, body: &str) -> Notice {
        classify(&TransportError::from_status(code, body), &Locale::default())
    }

    #[test]
    fn bad_request_translates_body_message() {
        assert_eq!(
            status(400, r#"{"code":400,"message":"title is required and cannot be empty"}"#),
            show("标题不能为空")
        );
    }

    #[test]
    fn bad_request_without_message_uses_fallback() {
        assert_eq!(status(400, r#"{"code":400}"#), show("请求参数错误"));
        assert_eq!(status(400, "not json"), show("请求参数错误"));
        assert_eq!(status(400, r#"{"message":""}"#), show("请求参数错误"));
    }

    #[test]
    fn not_found_translates_or_falls_back() {
        assert_eq!(status(404, r#"{"message":"todo not found: id=9"}"#), show("待办事项不存在"));
        assert_eq!(status(404, ""), show("请求的资源不存在"));
    }

    #[test]
    fn conflict_is_suppressed_whatever_the_body() {
        assert_eq!(status(409, r#"{"message":"version conflict"}"#), Notice::Suppress);
        assert_eq!(status(409, ""), Notice::Suppress);
    }

    #[test]
    fn server_error_ignores_body_message() {
        assert_eq!(status(500, r#"{"message":"todo not found"}"#), show("服务器内部错误"));
    }

    #[test]
    fn other_statuses_translate_or_report_the_code() {
        assert_eq!(status(422, r#"{"message":"Invalid input: eof"}"#), show("输入内容有误"));
        assert_eq!(status(503, "Service Unavailable"), show("请求失败 (503)"));
        // Untranslatable messages pass through verbatim.
        assert_eq!(status(418, r#"{"message":"teapot"}"#), show("teapot"));
    }

    #[test]
    fn no_response_uses_fixed_network_text() {
        let notice = classify(&TransportError::no_response("operation timed out"), &Locale::default());
        assert_eq!(notice, show("网络连接失败，请检查网络"));
    }

    #[test]
    fn never_sent_shows_own_message_or_fallback() {
        let locale = Locale::default();
        assert_eq!(
            classify(&TransportError::never_sent("builder error: relative URL"), &locale),
            show("builder error: relative URL")
        );
        assert_eq!(classify(&TransportError::never_sent(""), &locale), show("请求失败"));
    }
}
