// Alert Channel Trait

use crate::Result;
use async_trait::async_trait;

/// Alert channel trait - one implementation per delivery transport
#[async_trait]
pub trait AlertChannel: Send + Sync {
    /// Deliver `message` to `target` (recipient list or URL, depending on the channel)
    async fn send(&self, target: &str, message: &str) -> Result<()>;

    /// Get the channel name for logging
    fn channel_name(&self) -> &str;
}
