use super::prompt::CompletionRequest;
use crate::config::GenerationConfig;
use crate::error::{ConfigError, GenerationError};
use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

/// Sends a rendered request to a completion service and returns the raw text
/// of the first choice.
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}

pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpCompletionClient {
    pub fn new(config: &GenerationConfig, api_key: String) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenerationError::Service(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Builds a client from the credential in the environment.
    pub fn from_env(config: &GenerationConfig) -> Result<Self, ConfigError> {
        let api_key = config.api_token()?;
        Self::new(config, api_key).map_err(|e| {
            warn!("could not build completion client: {}", e);
            ConfigError::ClientSetup(e.to_string())
        })
    }
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.endpoint);
        info!("requesting completion from {} ({})", url, request.model);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| GenerationError::Service(e.to_string()))?;

        check_status(response.status())?;

        let body: ChatResponse = response
            .json()
            .map_err(|e| GenerationError::Service(e.to_string()))?;
        first_content(body)
    }
}

fn check_status(status: StatusCode) -> Result<(), GenerationError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(GenerationError::Service(format!(
            "service returned status {}",
            status
        )))
    }
}

/// Text of the first choice. An empty choice list or null content is a
/// service failure.
fn first_content(body: ChatResponse) -> Result<String, GenerationError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| GenerationError::Service("service returned an empty response".to_string()))
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::cell::{Cell, RefCell};

    pub const SAMPLE_RESPONSE: &str = r#"{"mcqs":[{"mcq":"Sample question 1","options":{"a":"Choice 1","b":"Choice 2","c":"Choice 3","d":"Choice 4"},"correct":"a"}]}"#;

    /// Replays canned replies in order, repeating the last one, and counts calls.
    pub struct ScriptedClient {
        replies: Vec<Result<String, GenerationError>>,
        calls: Cell<usize>,
        pub last_request: RefCell<Option<CompletionRequest>>,
    }

    impl ScriptedClient {
        pub fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
            Self {
                replies,
                calls: Cell::new(0),
                last_request: RefCell::new(None),
            }
        }

        pub fn replying(body: &str) -> Self {
            Self::new(vec![Ok(body.to_string())])
        }

        pub fn calls(&self) -> usize {
            self.calls.get()
        }
    }

    impl CompletionClient for ScriptedClient {
        fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            *self.last_request.borrow_mut() = Some(request.clone());
            let idx = n.min(self.replies.len().saturating_sub(1));
            self.replies
                .get(idx)
                .cloned()
                .unwrap_or_else(|| Err(GenerationError::Service("no scripted reply".to_string())))
        }
    }

    /// Lets tests keep a handle on the fake after it is boxed into the engine.
    impl<T: CompletionClient + ?Sized> CompletionClient for std::rc::Rc<T> {
        fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
            (**self).complete(request)
        }
    }
}
