//! Conversational housing assistant backed by a streaming generative-text API.

mod conversation;
mod gemini;
mod provider;
pub mod router;

pub use conversation::{AssistantConversation, AssistantReply, APOLOGY, GREETING};
pub use gemini::GeminiProvider;
pub use provider::{
    AssistantError, AssistantProvider, ChatMessage, ChatRole, ChatTurn, FragmentStream,
    UnconfiguredProvider,
};
pub use router::{assistant_router, SharedConversation};

use std::sync::Arc;

use crate::config::AssistantConfig;

pub const SYSTEM_INSTRUCTION: &str = "You are CASA, a friendly assistant for people searching for affordable housing in New York City. \
Explain Area Median Income (AMI), income eligibility bands, Housing Connect lotteries, HPD and HDC programs, \
vouchers such as Section 8 and CityFHEPS, community preference, and application documents in plain language. \
Keep answers short and practical. Do not promise eligibility for a specific unit; point people to the official \
listing and Housing Connect for final requirements. If you are unsure, say so.";

/// Gemini when an API key is configured, otherwise a provider that always fails.
pub fn provider_from_config(
    config: &AssistantConfig,
) -> Result<Arc<dyn AssistantProvider>, AssistantError> {
    let provider: Arc<dyn AssistantProvider> = match GeminiProvider::from_config(config)? {
        Some(provider) => Arc::new(provider) as Arc<dyn AssistantProvider>,
        None => {
            tracing::warn!("GEMINI_API_KEY not set; assistant replies will be apologies");
            Arc::new(UnconfiguredProvider) as Arc<dyn AssistantProvider>
        }
    };
    Ok(provider)
}
