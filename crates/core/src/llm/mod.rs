pub mod anthropic;
pub mod error;
pub mod json;
pub mod prompt;

pub use prompt::StrategyPrompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
}

/// One round trip to a reasoning model. No retries at this layer: a
/// failed call is treated the same as having no backend at all.
#[async_trait::async_trait]
pub trait ReasoningBackend: Send + Sync {
    fn provider(&self) -> Provider;

    /// Returns the model's JSON object. Schema enforcement happens in the
    /// caller so partial answers can degrade field by field.
    async fn complete(&self, prompt: &StrategyPrompt) -> anyhow::Result<serde_json::Value>;
}
