use serde::{Deserialize, Serialize};

/// Output cap sent with every completion request.
pub const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatResponseChoice>,
}

impl ChatResponse {
    /// Content of the first choice, if the provider sent one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_expected_fields() {
        let request = ChatRequest {
            model: "mistralai/mistral-7b-instruct:free".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["model"], "mistralai/mistral-7b-instruct:free");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Hello");
        assert_eq!(value["max_tokens"], 1000);
        assert_eq!(value["temperature"], 0.7);
    }

    #[test]
    fn response_tolerates_null_content_and_extra_fields() {
        let raw = r#"{"id":"gen-1","choices":[{"index":0,"message":{"role":"assistant","content":null},"finish_reason":"stop"}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(response.first_content(), None);
        assert_eq!(response.choices.len(), 1);
    }
}
