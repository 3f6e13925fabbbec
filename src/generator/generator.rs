use super::cache::GenerationResult;
use super::client::CompletionClient;
use super::parser::parse_response;
use super::prompt::PromptBuilder;
use crate::models::Difficulty;
use log::{info, warn};

/// Prompt → completion service → parser, one uncached attempt per call.
pub struct QuizGenerator {
    prompts: PromptBuilder,
    client: Box<dyn CompletionClient>,
}

impl QuizGenerator {
    pub fn new(prompts: PromptBuilder, client: Box<dyn CompletionClient>) -> Self {
        Self { prompts, client }
    }

    pub fn generate(&self, text: &str, difficulty: Difficulty) -> GenerationResult {
        let request = self.prompts.request(text, difficulty);
        let raw = self.client.complete(&request).map_err(|e| {
            warn!("completion request failed: {}", e);
            e
        })?;

        match parse_response(&raw) {
            Ok(questions) => {
                info!("generated {} {} questions", questions.len(), difficulty);
                Ok(questions)
            }
            Err(e) => {
                warn!("discarding completion response: {}", e);
                Err(e)
            }
        }
    }
}
