//! Anthropic Messages API payloads.

use crate::ai::{null_as_default, VendorError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<RequestBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RequestBlock {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
}

/// Response envelope; every level is optional so odd replies still decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub error: Option<VendorError>,
}

/// Response content block. Anything that is not a well-formed text block,
/// including a text block whose `text` is not a string, lands in `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContentBlock {
    Text(TextBlock),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl MessagesResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(TextBlock {
                kind: "text".to_string(),
                text: text.into(),
            })],
            error: None,
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text(block) if block.kind == "text" => Some(block.text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = MessagesRequest {
            model: "claude".to_string(),
            max_tokens: 1000,
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    RequestBlock::Image {
                        source: ImageSource::Base64 {
                            media_type: "image/png".to_string(),
                            data: "iVBORw==".to_string(),
                        },
                    },
                    RequestBlock::Text {
                        text: "diagnose".to_string(),
                    },
                ],
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["messages"][0]["content"][0],
            serde_json::json!({
                "type": "image",
                "source": { "type": "base64", "media_type": "image/png", "data": "iVBORw==" }
            })
        );
        assert_eq!(
            json["messages"][0]["content"][1],
            serde_json::json!({ "type": "text", "text": "diagnose" })
        );
    }

    #[test]
    fn test_first_text_skips_other_blocks() {
        let response: MessagesResponse = serde_json::from_value(serde_json::json!({
            "id": "msg_1",
            "content": [
                { "type": "thinking", "thinking": "hmm" },
                { "type": "text", "text": "{\"image_quality\":\"clear\"}" },
                { "type": "text", "text": "later" }
            ],
            "stop_reason": "end_turn"
        }))
        .unwrap();

        assert_eq!(response.first_text(), Some("{\"image_quality\":\"clear\"}"));
    }

    #[test]
    fn test_empty_content_has_no_text() {
        let response: MessagesResponse =
            serde_json::from_value(serde_json::json!({ "content": [] })).unwrap();
        assert_eq!(response.first_text(), None);

        let response: MessagesResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_null_content_has_no_text() {
        let response: MessagesResponse =
            serde_json::from_value(serde_json::json!({ "content": null })).unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_ill_typed_text_block_is_skipped() {
        let response: MessagesResponse = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "text", "text": 5 },
                { "type": "text" },
                { "type": "thinking", "text": "not an answer" }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text(), None);

        let response: MessagesResponse = serde_json::from_value(serde_json::json!({
            "content": [{ "type": "text", "text": null }, { "type": "text", "text": "ok" }]
        }))
        .unwrap();
        assert_eq!(response.first_text(), Some("ok"));
    }
}
