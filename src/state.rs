//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。

use std::sync::Arc;

use crate::llm::TextCompletionProvider;

/// 应用共享状态
///
/// 请求之间没有可变共享数据，只共享上游模型的调用能力
#[derive(Clone)]
pub struct AppState {
    /// 上游模型
    pub provider: Arc<dyn TextCompletionProvider>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(provider: Arc<dyn TextCompletionProvider>) -> Self {
        Self { provider }
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state(provider: Arc<dyn TextCompletionProvider>) -> Arc<AppState> {
    Arc::new(AppState::new(provider))
}
