//! 文本补全能力抽象
//!
//! 路由处理器只依赖这个 trait，测试中可以替换为内存实现。

use async_trait::async_trait;

use super::types::LlmError;

/// 单轮文本补全：发送一个用户提示词，返回模型的原始回复文本
#[async_trait]
pub trait TextCompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
