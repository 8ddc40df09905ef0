use crate::conversation::{ChatMessage, ChatRole};
use anyhow::{Context, Result, anyhow};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use std::time::Duration;

/// A language-generation service that turns a prompt into a reply.
///
/// Any error is treated by the session as "reply unavailable".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationDriver: Send + Sync {
    async fn generate(&self, messages: Vec<ChatMessage>, max_tokens: u32) -> Result<String>;
}

/// An implementation of `ConversationDriver` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier to use for chat completions (e.g., "llama-3.1-8b-instant").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

fn to_request_message(message: ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let built: ChatCompletionRequestMessage = match message.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
    };
    Ok(built)
}

#[async_trait]
impl ConversationDriver for OpenAICompatibleClient {
    async fn generate(&self, messages: Vec<ChatMessage>, max_tokens: u32) -> Result<String> {
        let messages = messages
            .into_iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        #[allow(deprecated)]
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(max_tokens)
            .build()?;

        let response: CreateChatCompletionResponse = self
            .client
            .chat()
            .create(request)
            .await
            .context("Chat completion request failed")?;

        let content = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .clone()
            .context("No content in LLM response")?;

        if content.trim().is_empty() {
            return Err(anyhow!("LLM returned an empty reply"));
        }
        Ok(content)
    }
}

/// Wraps a driver with a per-call deadline. An elapsed deadline is reported
/// as an ordinary generation error.
pub struct TimeoutDriver<D> {
    inner: D,
    timeout: Duration,
}

impl<D> TimeoutDriver<D> {
    pub fn new(inner: D, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<D: ConversationDriver> ConversationDriver for TimeoutDriver<D> {
    async fn generate(&self, messages: Vec<ChatMessage>, max_tokens: u32) -> Result<String> {
        tokio::time::timeout(self.timeout, self.inner.generate(messages, max_tokens))
            .await
            .map_err(|_| anyhow!("generation timed out after {:?}", self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowDriver(Duration);

    #[async_trait]
    impl ConversationDriver for SlowDriver {
        async fn generate(&self, _messages: Vec<ChatMessage>, _max_tokens: u32) -> Result<String> {
            tokio::time::sleep(self.0).await;
            Ok("late".to_string())
        }
    }

    #[tokio::test]
    async fn test_timeout_driver_passes_through_fast_replies() {
        let mut inner = MockConversationDriver::new();
        inner
            .expect_generate()
            .withf(|messages, max_tokens| messages.len() == 1 && *max_tokens == 150)
            .times(1)
            .returning(|_, _| Ok("hello".to_string()));

        let driver = TimeoutDriver::new(inner, Duration::from_secs(5));
        let reply = driver
            .generate(vec![ChatMessage::system("sys")], 150)
            .await
            .unwrap();
        assert_eq!(reply, "hello");
    }

    #[tokio::test]
    async fn test_timeout_driver_reports_elapsed_deadline() {
        let driver = TimeoutDriver::new(SlowDriver(Duration::from_secs(5)), Duration::from_millis(20));
        let err = driver
            .generate(vec![ChatMessage::system("sys")], 150)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_timeout_driver_propagates_inner_errors() {
        let mut inner = MockConversationDriver::new();
        inner
            .expect_generate()
            .returning(|_, _| Err(anyhow!("service unavailable")));

        let driver = TimeoutDriver::new(inner, Duration::from_secs(5));
        let err = driver.generate(vec![], 150).await.unwrap_err();
        assert_eq!(err.to_string(), "service unavailable");
    }

    #[test]
    fn test_chat_messages_convert_to_request_messages() {
        let converted = to_request_message(ChatMessage::system("be nice")).unwrap();
        assert!(matches!(converted, ChatCompletionRequestMessage::System(_)));
        let converted = to_request_message(ChatMessage {
            role: ChatRole::Assistant,
            content: "hi".into(),
        })
        .unwrap();
        assert!(matches!(converted, ChatCompletionRequestMessage::Assistant(_)));
    }
}
