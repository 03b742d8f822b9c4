//! Test doubles shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::Result;
use crate::image::{GeneratedImage, GenerationRequest, ImageProvider};

/// Records requests and replays a canned outcome.
pub(crate) struct FakeProvider {
    calls: Mutex<Vec<GenerationRequest>>,
    outcome: fn() -> Result<GeneratedImage>,
}

impl FakeProvider {
    pub(crate) fn new(outcome: fn() -> Result<GeneratedImage>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome,
        })
    }

    pub(crate) fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageProvider for FakeProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        self.calls.lock().unwrap().push(request.clone());
        (self.outcome)()
    }

    fn name(&self) -> &str {
        "fake"
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
