use async_trait::async_trait;

use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Returns the raw reply text for one ticket. Failures must surface as
    /// errors; an empty reply is a valid answer.
    async fn complete(&self, system_prompt: &str, ticket_text: &str) -> AppResult<String>;

    fn model_id(&self) -> &str;
}
