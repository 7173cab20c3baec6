//! 服务层模块

pub mod booking_service;
pub mod language_service;
mod llm_service;
mod prompt_service;
pub mod reply_parser;

pub use llm_service::LlmService;
pub use prompt_service::PromptService;
