//! Localization of server error messages.
//!
//! # Design
//! The server reports failures as free English text. `PhraseTable` maps that
//! text to a user-facing message by case-insensitive substring containment,
//! scanning entries in declaration order and stopping at the first hit. The
//! table is a `Vec` of pairs rather than a map: several phrases overlap
//! (`"required"` appears inside `"title is required and cannot be empty"`,
//! and `"Invalid input: ..."` messages often end in `"required"`), so entry
//! order decides the result.
//!
//! `Messages` holds the fixed notification texts the classifier uses when the
//! server gave nothing translatable. `Locale` bundles both.

/// The zh-CN phrase table. Order is significant.
const ZH_CN_PHRASES: &[(&str, &str)] = &[
    ("title is required and cannot be empty", "标题不能为空"),
    ("title cannot exceed 255 characters", "标题长度不能超过 255 个字符"),
    ("invalid category", "分类无效"),
    ("priority must be between 0 and 5", "优先级必须在 0 到 5 之间"),
    ("invalid id", "ID 无效"),
    ("todo not found", "待办事项不存在"),
    ("version conflict", "数据已被其他设备修改"),
    ("Invalid input", "输入内容有误"),
    ("required", "必填项未填写"),
];

/// Translate with the zh-CN table. Returns `message` unchanged when no phrase
/// matches.
pub fn translate(message: &str) -> String {
    lookup(ZH_CN_PHRASES.iter().copied(), message)
        .unwrap_or(message)
        .to_string()
}

fn lookup<'a, I>(entries: I, message: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let haystack = message.to_lowercase();
    entries
        .into_iter()
        .find(|(source, _)| haystack.contains(&source.to_lowercase()))
        .map(|(_, target)| target)
}

/// Ordered substring → replacement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseTable {
    entries: Vec<(String, String)>,
}

impl PhraseTable {
    pub fn zh_cn() -> Self {
        Self::from_pairs(ZH_CN_PHRASES.iter().copied())
    }

    pub fn from_pairs<S, T>(pairs: impl IntoIterator<Item = (S, T)>) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(source, target)| (source.into(), target.into()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// First entry whose source phrase occurs in `message`, ignoring case,
    /// wins. Unmatched input comes back unchanged; empty input stays empty,
    /// so callers pick their own fallback first.
    pub fn translate(&self, message: &str) -> String {
        lookup(
            self.entries.iter().map(|(source, target)| (source.as_str(), target.as_str())),
            message,
        )
        .unwrap_or(message)
        .to_string()
    }
}

impl Default for PhraseTable {
    fn default() -> Self {
        Self::zh_cn()
    }
}

/// Fixed notification texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub request_failed: String,
    pub bad_request: String,
    pub not_found: String,
    pub server_error: String,
    pub network_failure: String,
    /// `{status}` is replaced with the numeric HTTP status.
    pub status_failed: String,
}

impl Messages {
    pub fn zh_cn() -> Self {
        Self {
            request_failed: "请求失败".to_string(),
            bad_request: "请求参数错误".to_string(),
            not_found: "请求的资源不存在".to_string(),
            server_error: "服务器内部错误".to_string(),
            network_failure: "网络连接失败，请检查网络".to_string(),
            status_failed: "请求失败 ({status})".to_string(),
        }
    }

    pub fn status_failed(&self, status: u16) -> String {
        self.status_failed.replace("{status}", &status.to_string())
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::zh_cn()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locale {
    pub phrases: PhraseTable,
    pub messages: Messages,
}

impl Locale {
    pub fn translate(&self, message: &str) -> String {
        self.phrases.translate(message)
    }

    /// Translate `message`, or use `fallback` when it is absent or empty.
    pub fn translate_or(&self, message: Option<&str>, fallback: &str) -> String {
        match message {
            Some(text) if !text.is_empty() => self.translate(text),
            _ => fallback.to_string(),
        }
    }
}
