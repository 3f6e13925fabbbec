use crate::config::GenerationConfig;
use crate::models::Difficulty;
use anyhow::{Context, Result};
use log::debug;
use rust_embed::RustEmbed;
use serde::Serialize;

#[derive(RustEmbed)]
#[folder = "resources/"]
struct Asset;

const COUNT_PLACEHOLDER: &str = "{count}";

/// Request body of a chat-completions call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

pub struct PromptBuilder {
    template: String,
    system: String,
    question_count: usize,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

fn load_asset(name: &str) -> Result<String> {
    let file = Asset::get(name).context(format!("Could not find embedded prompt file: {}", name))?;
    let text = std::str::from_utf8(file.data.as_ref())?;
    Ok(text.trim_end().to_string())
}

impl PromptBuilder {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        Ok(Self {
            template: load_asset("prompt.txt")?,
            system: load_asset("system.txt")?,
            question_count: config.questions_per_prompt.max(1),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Renders the user message. The instruction text is the same for every
    /// difficulty; the difficulty only labels the request.
    pub fn build_prompt(&self, text: &str, difficulty: Difficulty) -> String {
        debug!(
            "rendering prompt for {} chars of {} text",
            text.chars().count(),
            difficulty
        );
        let instructions = self
            .template
            .replace(COUNT_PLACEHOLDER, &self.question_count.to_string());
        format!("{} {}", instructions, text)
    }

    pub fn request(&self, text: &str, difficulty: Difficulty) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: self.build_prompt(text, difficulty),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PromptBuilder {
        PromptBuilder::new(&GenerationConfig::default()).unwrap()
    }

    #[test]
    fn test_prompt_ends_with_user_text() {
        let prompt = builder().build_prompt("Photosynthesis uses sunlight", Difficulty::Easy);
        assert!(prompt.contains("create a quiz with 3 multiple-choice questions"));
        assert!(prompt.contains("Return only raw JSON"));
        assert!(prompt.ends_with("Text to generate questions from: Photosynthesis uses sunlight"));
        assert!(!prompt.contains(COUNT_PLACEHOLDER));
    }

    #[test]
    fn test_prompt_does_not_branch_on_difficulty() {
        let b = builder();
        let easy = b.build_prompt("cells divide", Difficulty::Easy);
        let hard = b.build_prompt("cells divide", Difficulty::Hard);
        assert_eq!(easy, hard);
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let b = builder();
        assert_eq!(
            b.request("x", Difficulty::Medium),
            b.request("x", Difficulty::Medium)
        );
    }

    #[test]
    fn test_request_payload_shape() {
        let request = builder().request("mitochondria", Difficulty::Medium);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["temperature"], 0.3);
        assert_eq!(json["messages"][0]["role"], "system");
        assert!(json["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("only responds with raw JSON"));
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn test_question_count_comes_from_config() {
        let config = GenerationConfig {
            questions_per_prompt: 7,
            ..GenerationConfig::default()
        };
        let prompt = PromptBuilder::new(&config)
            .unwrap()
            .build_prompt("t", Difficulty::Easy);
        assert!(prompt.contains("with 7 multiple-choice questions"));
    }
}
