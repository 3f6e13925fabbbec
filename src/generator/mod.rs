pub mod cache;
pub mod client;
pub mod generator;
pub mod parser;
pub mod prompt;

pub use cache::QuestionCache;
pub use client::HttpCompletionClient;
pub use generator::QuizGenerator;
pub use prompt::PromptBuilder;
