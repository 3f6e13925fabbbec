use crate::error::ConfigError;
use crate::models::Difficulty;
use anyhow::Result;
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Theme {
    pub bg: String,      // background
    pub main: String,    // brand color (score, selected option)
    pub caret: String,   // input cursor
    pub text: String,    // question and option text
    pub sub: String,     // labels, inactive text
    #[serde(alias = "subAlt", alias = "subalt")]
    pub sub_alt: String, // borders, footer
    pub error: String,   // wrong answers, warnings
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: "#2c2e34".to_string(),
            main: "#e2b714".to_string(),
            caret: "#e2b714".to_string(),
            text: "#d1d0c5".to_string(),
            sub: "#646669".to_string(),
            sub_alt: "#45474d".to_string(),
            error: "#ca4754".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub questions_per_prompt: usize,
    pub cache_failures: bool,
    pub token_var: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://models.inference.ai.azure.com".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
            timeout_secs: 30,
            questions_per_prompt: 3,
            cache_failures: true,
            token_var: "GITHUB_TOKEN".to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Reads the credential named by `token_var` from the process environment.
    pub fn api_token(&self) -> Result<String, ConfigError> {
        match env::var(&self.token_var) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(ConfigError::MissingCredential(self.token_var.clone())),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuizConfig {
    pub question_count: usize,
    pub difficulty: Difficulty,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: 3,
            difficulty: Difficulty::Easy,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub theme: Theme,
    pub generation: GenerationConfig,
    pub quiz: QuizConfig,
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "quizgen")
}

fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?;
        let builder = match config_path() {
            Some(path) if path.exists() => builder.add_source(File::from(path)),
            _ => builder,
        };
        let cfg = builder
            .add_source(Environment::with_prefix("QUIZGEN").separator("__"))
            .build()?;

        // "subAlt" is mapped onto sub_alt by the serde alias
        let app_config: AppConfig = cfg.try_deserialize()?;
        Ok(app_config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let theme = Theme::default();
        let generation = GenerationConfig::default();
        let quiz = QuizConfig::default();

        let builder = Config::builder()
            .set_default("theme.bg", theme.bg)?
            .set_default("theme.main", theme.main)?
            .set_default("theme.caret", theme.caret)?
            .set_default("theme.text", theme.text)?
            .set_default("theme.sub", theme.sub)?
            .set_default("theme.subAlt", theme.sub_alt)?
            .set_default("theme.error", theme.error)?
            .set_default("generation.endpoint", generation.endpoint)?
            .set_default("generation.model", generation.model)?
            .set_default("generation.temperature", generation.temperature)?
            .set_default("generation.max_tokens", generation.max_tokens as i64)?
            .set_default("generation.timeout_secs", generation.timeout_secs as i64)?
            .set_default(
                "generation.questions_per_prompt",
                generation.questions_per_prompt as i64,
            )?
            .set_default("generation.cache_failures", generation.cache_failures)?
            .set_default("generation.token_var", generation.token_var)?
            .set_default("quiz.question_count", quiz.question_count as i64)?
            .set_default("quiz.difficulty", quiz.difficulty.label())?;

        Ok(builder)
    }

    #[cfg(test)]
    fn from_toml(source: &str) -> Result<Self> {
        let cfg = Self::defaults()?
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}
