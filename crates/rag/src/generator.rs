//! Answer generation with a single round of tool use.

use crate::tools::ToolRun;
use coursemate_core::AppResult;
use coursemate_llm::{
    ContentBlock, LlmClient, LlmError, Message, MessageRequest, MessageResponse, ToolChoice,
    ToolDefinition,
};
use coursemate_prompt::build_system_prompt;
use std::sync::Arc;

pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Reply when the provider rejects the request itself, typically billing.
pub const BAD_REQUEST_MESSAGE: &str =
    "The AI service rejected the request. The account may be out of credit; please check the account's billing settings and try again.";

/// Reply when the provider rejects the credential.
pub const AUTHENTICATION_MESSAGE: &str =
    "The AI service could not authenticate this request. Please check that a valid API key is configured.";

/// Reply when the provider is throttling requests.
pub const RATE_LIMIT_MESSAGE: &str =
    "The AI service is receiving too many requests right now. Please wait a moment and try again.";

/// Fixed user-facing text for the provider failures that have one.
fn friendly_message(err: &LlmError) -> Option<&'static str> {
    match err {
        LlmError::BadRequest(_) => Some(BAD_REQUEST_MESSAGE),
        LlmError::Authentication(_) => Some(AUTHENTICATION_MESSAGE),
        LlmError::RateLimited(_) => Some(RATE_LIMIT_MESSAGE),
        _ => None,
    }
}

/// Drives the model through one question.
///
/// The model either answers directly, or requests tools once; in that case
/// the tool results are sent back in a second call that offers no tools.
pub struct AiGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl AiGenerator {
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: system_prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.0,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer `query`, letting the model call tools at most once.
    ///
    /// Tools are offered only when `tools` is given; they can only run when
    /// `tool_run` is given too. Bad-request, authentication and rate-limit
    /// failures from either call come back as fixed `Ok` messages. Every
    /// other provider failure is returned as an error.
    pub async fn generate_response(
        &self,
        query: &str,
        conversation_history: Option<&str>,
        tools: Option<&[ToolDefinition]>,
        tool_run: Option<&mut ToolRun<'_>>,
    ) -> AppResult<String> {
        let system = build_system_prompt(&self.system_prompt, conversation_history);

        let mut request = self.request(vec![Message::user(query)], &system);
        if let Some(tools) = tools {
            request = request.with_tools(tools.to_vec(), ToolChoice::Auto);
        }

        tracing::info!(
            "Generating response with {} (tools offered: {})",
            self.model,
            tools.map_or(0, |t| t.len())
        );

        let response = match self.client.create_message(&request).await {
            Ok(response) => response,
            Err(err) => return recover(err),
        };

        if !response.wants_tools() {
            return Ok(response.text());
        }

        let Some(run) = tool_run else {
            tracing::warn!("Model requested tools but none can run; returning its text");
            return Ok(response.text());
        };

        self.follow_up(query, &system, response, run).await
    }

    async fn follow_up(
        &self,
        query: &str,
        system: &str,
        response: MessageResponse,
        run: &mut ToolRun<'_>,
    ) -> AppResult<String> {
        let mut results = Vec::new();
        for (id, name, input) in response.tool_uses() {
            tracing::info!("Model requested tool '{}' ({})", name, id);
            let content = run.execute_tool(name, input).await;
            results.push(ContentBlock::tool_result(id, content));
        }

        if results.is_empty() {
            tracing::warn!("Model stopped for tool use without any tool_use blocks");
            return Ok(response.text());
        }

        let messages = vec![
            Message::user(query),
            Message::assistant_blocks(
                response
                    .content
                    .into_iter()
                    .filter(|block| !matches!(block, ContentBlock::Unknown))
                    .collect(),
            ),
            Message::user_blocks(results),
        ];

        match self.client.create_message(&self.request(messages, system)).await {
            Ok(final_response) => Ok(final_response.text()),
            Err(err) => recover(err),
        }
    }

    fn request(&self, messages: Vec<Message>, system: &str) -> MessageRequest {
        MessageRequest::new(&self.model, self.max_tokens, messages)
            .with_temperature(self.temperature)
            .with_system(system)
    }
}

fn recover(err: LlmError) -> AppResult<String> {
    match friendly_message(&err) {
        Some(message) => {
            tracing::warn!("LLM request failed, replying with notice: {}", err);
            Ok(message.to_string())
        }
        None => {
            tracing::error!("LLM request failed: {}", err);
            Err(err.into())
        }
    }
}
