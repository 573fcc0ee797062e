use serde::{Deserialize, Serialize};
use serde_json::value::{to_raw_value, RawValue};

use crate::{config::RequestDefaults, error::AppError};

/// `/ask` keeps the shorter reply budget of the question form it replaces.
pub const ASK_MAX_TOKENS: u32 = 1024;

/// Body accepted by `POST /api/anthropic`.
///
/// `messages` is kept as the caller's raw JSON text and forwarded as-is; the
/// upstream is the only party that validates it.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    pub messages: Box<RawValue>,
}

impl CompletionRequest {
    pub fn into_params(self, defaults: &RequestDefaults) -> MessageParams {
        MessageParams {
            model: self.model.unwrap_or_else(|| defaults.model.clone()),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            messages: self.messages,
        }
    }
}

/// The exact triple sent to the upstream messages endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MessageParams {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Box<RawValue>,
}

/// Two sets of params are equal when `messages` carries the same JSON text.
impl PartialEq for MessageParams {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model
            && self.max_tokens == other.max_tokens
            && self.messages.get() == other.messages.get()
    }
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

impl AskRequest {
    /// Wraps the question as a single user turn.
    pub fn into_params(self, defaults: &RequestDefaults) -> Result<MessageParams, AppError> {
        let question = self.question.ok_or(AppError::MissingQuestion)?;
        let messages = to_raw_value(&[UserTurn {
            role: "user",
            content: &question,
        }])?;

        Ok(MessageParams {
            model: defaults.model.clone(),
            max_tokens: ASK_MAX_TOKENS,
            messages,
        })
    }
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}
