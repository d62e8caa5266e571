//! Scripted completion client for use case unit tests.

use crate::ports::completion_client::{CompletionRequest, StructuredCompletionClient};
use agentm_domain::{Completion, CompletionOutcome};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&CompletionRequest) -> CompletionOutcome + Send + Sync>;

pub(crate) struct ScriptedClient {
    respond: Responder,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new(
        respond: impl Fn(&CompletionRequest) -> CompletionOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with `value`
    pub(crate) fn constant(value: Value) -> Self {
        Self::new(move |_| Ok(Completion::new(value.clone())))
    }

    pub(crate) fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl StructuredCompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome {
        self.calls.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        (self.respond)(&request)
    }
}

/// The text after the last `<ITEM>` marker of a user prompt.
pub(crate) fn prompt_item(request: &CompletionRequest) -> &str {
    let content = request.prompt.content.as_str();
    content
        .rsplit_once("<ITEM>\n")
        .map(|(_, item)| item)
        .unwrap_or(content)
}
