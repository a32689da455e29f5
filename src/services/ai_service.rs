use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::integrations::LlmProvider;
use crate::models::{ChatMessage, ChatRole, Intent, IntentResult, MatchContext, WalletTransaction};
use crate::services::context_assembler::{AIContext, ContextAssembler, WalletContext};
use crate::services::intent_matcher::IntentMatcher;
use crate::services::session_store::SessionStore;

const MEMORY_KEYWORDS: &[&str] = &["transaction", "spent", "history", "payment"];

// Internal helper that checks whether any keyword appears in `text`.
fn contains_any_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Summary of `transactions` for prompts that ask about past activity.
pub fn memory_summary(prompt: &str, transactions: &[WalletTransaction]) -> Option<String> {
    if !contains_any_keyword(&prompt.to_lowercase(), MEMORY_KEYWORDS) {
        return None;
    }
    if transactions.is_empty() {
        return Some("Transaction data: no recent transactions found for this wallet.".to_string());
    }
    let entries = transactions
        .iter()
        .map(|tx| {
            let description = if tx.description.is_empty() {
                "Transaction"
            } else {
                tx.description.as_str()
            };
            let amount = if tx.amount.is_empty() {
                "amount unknown"
            } else {
                tx.amount.as_str()
            };
            format!("{} ({})", description, amount)
        })
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("Transaction data: {}", entries))
}

/// One chat turn as seen by the assistant.
#[derive(Debug, Clone)]
pub struct AssistantRequest {
    pub session_id: String,
    pub prompt: String,
    pub wallet: MatchContext,
    pub recent_transactions: Vec<WalletTransaction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub message: String,
    pub intent: Option<Intent>,
    pub suggestions: Vec<String>,
    pub wallet_data: WalletContext,
}

/// AI Service - answers chat turns with the local matcher, falling back to
/// the LLM for free-form questions.
pub struct AIService {
    sessions: Arc<SessionStore>,
    matcher: Arc<IntentMatcher>,
    assembler: Arc<ContextAssembler>,
    llm: Option<Arc<dyn LlmProvider>>,
}

impl AIService {
    pub fn new(
        sessions: Arc<SessionStore>,
        matcher: Arc<IntentMatcher>,
        assembler: Arc<ContextAssembler>,
        llm: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self {
            sessions,
            matcher,
            assembler,
            llm,
        }
    }

    #[cfg(test)]
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Appends a transaction summary to the session when the prompt asks
    /// about past activity on a connected wallet.
    pub async fn remember_transactions(&self, request: &AssistantRequest) {
        if !request.wallet.wallet_connected {
            return;
        }
        if let Some(summary) = memory_summary(&request.prompt, &request.recent_transactions) {
            tracing::debug!("Detected transaction memory query");
            self.sessions
                .append_message(&request.session_id, ChatMessage::assistant(summary))
                .await;
        }
    }

    /// Answers one chat turn. The user message is expected to be in the
    /// session already; the reply is appended before returning.
    pub async fn respond(&self, request: &AssistantRequest) -> Result<AssistantReply> {
        let mut wallet = request.wallet.clone();
        wallet.preferred_tokens = self.sessions.profile(&request.session_id).await.preferred_tokens;

        let (matched, context) = tokio::join!(
            self.matcher.parse(&request.prompt, &wallet),
            self.assembler.generate_context(&request.session_id)
        );
        tracing::debug!(
            "AI context generated with system prompt length {}",
            context.system_prompt.len()
        );

        let mut reply = if matched.intent.is_some() {
            matched
        } else {
            self.ask_llm(request, &context).await.unwrap_or(matched)
        };

        self.sessions
            .append_message(&request.session_id, ChatMessage::assistant(reply.message.clone()))
            .await;

        if reply.suggestions.is_empty() {
            reply.suggestions = context.suggested_topics.clone();
        }

        let wallet_data = context
            .wallet_data
            .unwrap_or_else(|| WalletContext {
                address: request.wallet.wallet_address.clone().unwrap_or_default(),
                sol_balance: request.wallet.balance,
                token_balances: request.wallet.token_balances.clone(),
                recent_transactions: request.recent_transactions.clone(),
                memory_enabled: false,
            });

        Ok(AssistantReply {
            message: reply.message,
            intent: reply.intent,
            suggestions: reply.suggestions,
            wallet_data,
        })
    }

    async fn ask_llm(&self, request: &AssistantRequest, context: &AIContext) -> Option<IntentResult> {
        let llm = self.llm.as_ref()?;

        let mut messages = Vec::with_capacity(context.recent_messages.len() + 2);
        messages.push(ChatMessage::system(context.system_prompt.clone()));
        messages.extend(context.recent_messages.iter().cloned());
        let prompt_is_last = context
            .recent_messages
            .last()
            .map(|last| last.role == ChatRole::User && last.content == request.prompt)
            .unwrap_or(false);
        if !prompt_is_last {
            messages.push(ChatMessage::user(request.prompt.clone()));
        }

        match llm.chat(messages).await {
            Ok(content) => {
                tracing::info!("{} answered session {}", llm.name(), request.session_id);
                Some(IntentResult::without_intent(content))
            }
            Err(e) => {
                tracing::warn!("{} failed, using local reply: {}", llm.name(), e);
                None
            }
        }
    }
}
