use std::sync::Arc;

use parking_lot::Mutex;

use crate::{CompletionClient, CompletionRequest, GatewayError};

#[derive(Debug, Clone)]
enum Script {
    Reply(String),
    Outage(String),
}

/// Offline completion client: answers every prompt with the same canned text,
/// or fails every call as if the API were unreachable.
///
/// Requests are only kept after [`ScriptedClient::recording`]; the offline
/// production backend never records.
#[derive(Debug, Clone)]
pub struct ScriptedClient {
    script: Script,
    seen: Option<Arc<Mutex<Vec<CompletionRequest>>>>,
}

impl ScriptedClient {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            script: Script::Reply(text.into()),
            seen: None,
        }
    }

    pub fn outage(reason: impl Into<String>) -> Self {
        Self {
            script: Script::Outage(reason.into()),
            seen: None,
        }
    }

    pub fn recording(mut self) -> Self {
        self.seen = Some(Arc::default());
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen
            .as_ref()
            .map(|seen| seen.lock().clone())
            .unwrap_or_default()
    }
}

impl CompletionClient for ScriptedClient {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        if let Some(seen) = &self.seen {
            seen.lock().push(request.clone());
        }
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Outage(reason) => Err(GatewayError::Unavailable(reason.clone())),
        }
    }
}
