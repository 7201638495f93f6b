use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use tracing::warn;

use super::provider::{AssistantError, AssistantProvider, ChatMessage, ChatRole, ChatTurn};

pub const GREETING: &str =
    "Hi! I can help you understand housing eligibility, AMI, or specific requirements. Ask me anything!";

/// Substituted for the reply whenever the assistant service fails.
pub const APOLOGY: &str =
    "Sorry, I encountered an error connecting to the AI service. Please check your API key.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub reply: String,
    pub failed: bool,
}

/// One chat session with the housing assistant.
///
/// The transcript is what an applicant sees, greeting and apologies included.
/// Only completed exchanges are sent back to the provider as history.
pub struct AssistantConversation<P: ?Sized> {
    provider: Arc<P>,
    transcript: Vec<ChatMessage>,
    history: Vec<ChatTurn>,
    next_id: u64,
}

impl<P> AssistantConversation<P>
where
    P: AssistantProvider + ?Sized,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            transcript: vec![ChatMessage {
                id: "0".to_string(),
                role: ChatRole::Model,
                text: GREETING.to_string(),
            }],
            history: Vec::new(),
            next_id: 1,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Send a message and wait for the full reply. Blank input is ignored.
    pub async fn ask(&mut self, text: &str) -> Option<AssistantReply> {
        self.ask_with(text, |_| {}).await
    }

    /// Like [`AssistantConversation::ask`], handing each fragment to
    /// `on_fragment` as it arrives.
    pub async fn ask_with<F>(&mut self, text: &str, mut on_fragment: F) -> Option<AssistantReply>
    where
        F: FnMut(&str) + Send,
    {
        if text.trim().is_empty() {
            return None;
        }

        self.record(ChatRole::User, text.to_string());

        match self.collect_reply(text, &mut on_fragment).await {
            Ok(reply) => {
                self.history.push(ChatTurn {
                    role: ChatRole::User,
                    text: text.to_string(),
                });
                self.history.push(ChatTurn {
                    role: ChatRole::Model,
                    text: reply.clone(),
                });
                self.record(ChatRole::Model, reply.clone());
                Some(AssistantReply {
                    reply,
                    failed: false,
                })
            }
            Err((partial, err)) => {
                warn!(error = %err, "assistant reply failed");
                if !partial.is_empty() {
                    self.record(ChatRole::Model, partial);
                }
                self.record(ChatRole::Model, APOLOGY.to_string());
                Some(AssistantReply {
                    reply: APOLOGY.to_string(),
                    failed: true,
                })
            }
        }
    }

    async fn collect_reply<F>(
        &self,
        text: &str,
        on_fragment: &mut F,
    ) -> Result<String, (String, AssistantError)>
    where
        F: FnMut(&str) + Send,
    {
        let mut stream = self
            .provider
            .stream_reply(&self.history, text)
            .await
            .map_err(|err| (String::new(), err))?;

        let mut reply = String::new();
        while let Some(fragment) = stream.next().await {
            match fragment {
                Ok(fragment) => {
                    on_fragment(&fragment);
                    reply.push_str(&fragment);
                }
                Err(err) => return Err((reply, err)),
            }
        }
        Ok(reply)
    }

    fn record(&mut self, role: ChatRole, text: String) {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.transcript.push(ChatMessage { id, role, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::provider::{FragmentStream, UnconfiguredProvider};
    use async_trait::async_trait;
    use futures::stream;
    use std::sync::Mutex;

    /// Streams fixed fragments and records the history it was given.
    #[derive(Default)]
    struct EchoProvider {
        fragments: Vec<Result<String, AssistantError>>,
        seen_history: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl AssistantProvider for EchoProvider {
        async fn stream_reply(
            &self,
            history: &[ChatTurn],
            _message: &str,
        ) -> Result<FragmentStream, AssistantError> {
            self.seen_history.lock().unwrap().push(history.len());
            Ok(Box::pin(stream::iter(self.fragments.clone())))
        }
    }

    fn fragments(parts: &[&str]) -> Vec<Result<String, AssistantError>> {
        parts.iter().map(|part| Ok(part.to_string())).collect()
    }

    #[tokio::test]
    async fn concatenates_fragments_and_streams_them_in_order() {
        let provider = Arc::new(EchoProvider {
            fragments: fragments(&["AMI is ", "Area Median ", "Income."]),
            ..EchoProvider::default()
        });
        let mut conversation = AssistantConversation::new(provider.clone());

        let mut streamed = Vec::new();
        let reply = conversation
            .ask_with("What is AMI?", |fragment| streamed.push(fragment.to_string()))
            .await
            .expect("reply");

        assert_eq!(reply.reply, "AMI is Area Median Income.");
        assert!(!reply.failed);
        assert_eq!(streamed.len(), 3);

        conversation.ask("And for a family of 3?").await.unwrap();
        assert_eq!(*provider.seen_history.lock().unwrap(), vec![0, 2]);

        let transcript = conversation.transcript();
        assert_eq!(transcript.len(), 5);
        assert_eq!(transcript[0].text, GREETING);
        assert_eq!(transcript[1].role, ChatRole::User);
        assert_eq!(transcript[2].text, "AMI is Area Median Income.");
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut conversation = AssistantConversation::new(Arc::new(UnconfiguredProvider));
        assert!(conversation.ask("   ").await.is_none());
        assert_eq!(conversation.transcript().len(), 1);
    }

    #[tokio::test]
    async fn failure_before_stream_substitutes_apology() {
        let mut conversation = AssistantConversation::new(Arc::new(UnconfiguredProvider));
        let reply = conversation.ask("Hello?").await.unwrap();
        assert!(reply.failed);
        assert_eq!(reply.reply, APOLOGY);

        let last = conversation.transcript().last().unwrap();
        assert_eq!(last.role, ChatRole::Model);
        assert_eq!(last.text, APOLOGY);
    }

    #[tokio::test]
    async fn failure_mid_stream_keeps_partial_text_and_excludes_turn_from_history() {
        let mut parts = fragments(&["Partial "]);
        parts.push(Err(AssistantError::Network("reset by peer".to_string())));
        let provider = Arc::new(EchoProvider {
            fragments: parts,
            ..EchoProvider::default()
        });
        let mut conversation = AssistantConversation::new(provider.clone());

        let reply = conversation.ask("Tell me about vouchers").await.unwrap();
        assert!(reply.failed);

        let texts: Vec<_> = conversation
            .transcript()
            .iter()
            .map(|message| message.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![GREETING, "Tell me about vouchers", "Partial ", APOLOGY]
        );

        conversation.ask("Try again").await.unwrap();
        assert_eq!(*provider.seen_history.lock().unwrap(), vec![0, 0]);
    }
}
