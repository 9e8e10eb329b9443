use thiserror::Error;

/// FormatError は decode / encode の唯一のエラー型
///
/// JSON トークンとして不正なもの、文字列以外のトークン、
/// layout に一致しない文字列、範囲外の日時をすべてここで表す。
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid JSON token: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON string, found {found}")]
    NotAString { found: &'static str },

    #[error("{input:?} does not match layout \"Mon, 02 Jan 2006 15:04:05 -0700\": {reason}")]
    Layout { input: String, reason: &'static str },

    #[error("{input:?} is out of range: {reason}")]
    Range { input: String, reason: &'static str },

    #[error("failed to encode timestamp: {0}")]
    Encode(String),
}

impl FormatError {
    pub(crate) fn layout(input: &str, reason: &'static str) -> Self {
        Self::Layout {
            input: input.to_owned(),
            reason,
        }
    }

    pub(crate) fn range(input: &str, reason: &'static str) -> Self {
        Self::Range {
            input: input.to_owned(),
            reason,
        }
    }
}
