//! Stub providers shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use textgen::core::dispatcher::Dispatcher;
use textgen::providers::{LlmProvider, ProviderId, ProviderSet, ReplyShape, UpstreamError};

/// Provider that returns a canned reply and records every call it receives.
pub struct StubProvider {
    id: ProviderId,
    model_id: &'static str,
    shape: ReplyShape,
    reply: Result<Value, UpstreamError>,
    calls: AtomicUsize,
    last_call: Mutex<Option<(String, f64, i64)>>,
}

impl StubProvider {
    pub fn replying(id: ProviderId, shape: ReplyShape, reply: Value) -> Arc<Self> {
        Self::build(id, shape, Ok(reply))
    }

    pub fn failing(id: ProviderId, shape: ReplyShape, message: &str) -> Arc<Self> {
        Self::build(id, shape, Err(UpstreamError::new(message)))
    }

    fn build(id: ProviderId, shape: ReplyShape, reply: Result<Value, UpstreamError>) -> Arc<Self> {
        let model_id = match id {
            ProviderId::Gemini => "gemini-1.5-flash",
            ProviderId::DeepSeek => "deepseek-chat",
        };
        Arc::new(Self {
            id,
            model_id,
            shape,
            reply,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<(String, f64, i64)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: i64,
    ) -> Result<Value, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((prompt.to_string(), temperature, max_tokens));
        self.reply.clone()
    }

    fn id(&self) -> ProviderId {
        self.id
    }

    fn model_id(&self) -> &str {
        self.model_id
    }

    fn reply_shape(&self) -> &ReplyShape {
        &self.shape
    }
}

/// Reply shape of the real Gemini adapter
pub fn gemini_shape() -> ReplyShape {
    *textgen::providers::GeminiProvider::new(reqwest::Client::new()).reply_shape()
}

/// Reply shape of the real DeepSeek adapter
pub fn deepseek_shape() -> ReplyShape {
    *textgen::providers::DeepSeekProvider::new(reqwest::Client::new()).reply_shape()
}

pub fn dispatcher(gemini: Arc<StubProvider>, deepseek: Arc<StubProvider>) -> Dispatcher {
    Dispatcher::new(ProviderSet::new(gemini, deepseek), ProviderId::Gemini)
}
