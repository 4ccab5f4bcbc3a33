//! Mock provider for testing.

use super::{ProviderError, VisionModel};
use async_trait::async_trait;
use std::sync::Mutex;

/// What the last `generate` call received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub mime_type: String,
    pub image_len: usize,
}

/// Scripted [`VisionModel`] that replays one fixed outcome.
pub struct MockVisionModel {
    reply: Result<String, ProviderError>,
    last_call: Mutex<Option<RecordedCall>>,
}

impl MockVisionModel {
    /// Always answer with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            last_call: Mutex::new(None),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            last_call: Mutex::new(None),
        }
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last_call.lock().ok().and_then(|slot| slot.clone())
    }
}

#[async_trait]
impl VisionModel for MockVisionModel {
    async fn generate(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, ProviderError> {
        if let Ok(mut slot) = self.last_call.lock() {
            *slot = Some(RecordedCall {
                prompt: prompt.to_string(),
                mime_type: mime_type.to_string(),
                image_len: image.len(),
            });
        }

        self.reply.clone()
    }
}
