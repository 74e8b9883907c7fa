//! Slack Block Kit payload types.
//!
//! Only the subset the reports use. Serialization follows the Block Kit JSON
//! contract, so `markdown` text goes out as `mrkdwn` and plain text keeps its
//! `emoji` flag. Escaping is left to Slack.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    #[serde(rename = "mrkdwn")]
    Markdown { text: String, verbatim: bool },
    PlainText { text: String, emoji: bool },
}

impl TextObject {
    pub fn text(&self) -> &str {
        match self {
            TextObject::Markdown { text, .. } | TextObject::PlainText { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button { text: TextObject, url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
    },
    Context {
        elements: Vec<TextObject>,
    },
    Divider,
    Actions {
        elements: Vec<Element>,
    },
}

/// Legacy attachment; the only way to get a coloured side bar on a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attachment {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_subname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

/// Machine-readable marker attached to a message so later runs can find it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageMetadata {
    pub event_type: String,
    pub event_payload: serde_json::Map<String, Value>,
}

impl MessageMetadata {
    pub fn new(event_type: &str, key: &str, value: &str) -> Self {
        let mut event_payload = serde_json::Map::new();
        event_payload.insert(key.to_string(), Value::String(value.to_string()));
        Self {
            event_type: event_type.to_string(),
            event_payload,
        }
    }
}

pub fn markdown(text: impl Into<String>) -> TextObject {
    TextObject::Markdown {
        text: text.into(),
        verbatim: false,
    }
}

pub fn plaintext(text: impl Into<String>) -> TextObject {
    TextObject::PlainText {
        text: text.into(),
        emoji: true,
    }
}

pub fn link_button(text: impl Into<String>, url: impl Into<String>) -> Element {
    Element::Button {
        text: plaintext(text),
        url: url.into(),
    }
}
