pub mod llm_service;
pub mod quiz_store;

pub use llm_service::LlmService;
pub use quiz_store::QuizStore;
