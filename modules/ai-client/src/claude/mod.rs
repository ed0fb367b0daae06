mod client;
pub(crate) mod types;

use std::time::Duration;

use crate::error::{AiError, Result};
use crate::schema::StructuredOutput;
use crate::util::{first_json_object, strip_code_blocks};

use client::{MessagesClient, ANTHROPIC_API_URL};
use types::{MessagesRequest, ToolSpec};

const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const STRUCTURED_TOOL: &str = "structured_response";

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    timeout: Duration,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> MessagesClient {
        MessagesClient::new(&self.api_key, &self.base_url, self.timeout)
    }

    /// Ask for a `T` by forcing a single tool call whose input schema is `T`'s.
    ///
    /// If the model answers in text instead, the first JSON object in that text
    /// is tried before giving up.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let request = MessagesRequest::new(&self.model, self.max_tokens)
            .system(system_prompt)
            .user(user_prompt)
            .temperature(0.0)
            .forced_tool(ToolSpec {
                name: STRUCTURED_TOOL.to_string(),
                description: format!("Return the {} for the input.", T::type_name()),
                input_schema: T::tool_schema(),
            });

        let response = self.client().send(&request).await?;

        if let Some(input) = response.tool_input(STRUCTURED_TOOL) {
            return Ok(serde_json::from_value(input.clone())?);
        }

        let text = response
            .text()
            .ok_or(AiError::EmptyResponse("structured output"))?;
        let json = first_json_object(strip_code_blocks(&text))
            .ok_or(AiError::EmptyResponse("structured output"))?;
        Ok(serde_json::from_str(json)?)
    }
}
