use async_trait::async_trait;

use crate::Result;

/// Port for the remote translation service.
///
/// One call per admitted message; implementations make a single attempt and never retry.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}
