//! Responder that records outgoing messages instead of calling Telegram

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use teloxide::types::ChatId;
use teloxide::RequestError;

use ioibot::telegram::Responder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
}

#[derive(Clone, Default)]
pub struct RecordingResponder {
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl RecordingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Text of the most recent message, if any.
    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|message| message.text.clone())
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), RequestError> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }
}
