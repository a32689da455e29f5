use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::constants::PREFERRED_TOKENS_CAP;

// ==================== CHAT ====================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

// ==================== PROFILE ====================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpertiseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ExpertiseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertiseLevel::Beginner => "beginner",
            ExpertiseLevel::Intermediate => "intermediate",
            ExpertiseLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub expertise_level: ExpertiseLevel,
    /// Most recently mentioned first, at most `PREFERRED_TOKENS_CAP` entries.
    pub preferred_tokens: Vec<String>,
    pub interests: Vec<String>,
    pub last_command: Option<String>,
    pub last_intent: Option<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            expertise_level: ExpertiseLevel::Beginner,
            preferred_tokens: vec!["SOL".to_string(), "USDC".to_string()],
            interests: Vec::new(),
            last_command: None,
            last_intent: None,
        }
    }
}

impl UserProfile {
    /// Puts a newly seen token at the front. Tokens already tracked keep
    /// their position.
    pub fn remember_token(&mut self, symbol: &str) {
        if self.preferred_tokens.iter().any(|token| token == symbol) {
            return;
        }
        self.preferred_tokens.insert(0, symbol.to_string());
        self.preferred_tokens.truncate(PREFERRED_TOKENS_CAP);
    }

    pub fn add_interest(&mut self, interest: &str) {
        if !self.interests.iter().any(|existing| existing == interest) {
            self.interests.push(interest.to_string());
        }
    }

    /// Raises the expertise level; it never goes back down.
    pub fn raise_expertise(&mut self, level: ExpertiseLevel) {
        if level > self.expertise_level {
            self.expertise_level = level;
        }
    }
}

// ==================== SESSION ====================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub messages: VecDeque<ChatMessage>,
    pub profile: UserProfile,
    pub wallet_address: Option<String>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: VecDeque::new(),
            profile: UserProfile::default(),
            wallet_address: None,
        }
    }

    /// Appends and evicts from the front until `capacity` holds.
    pub fn push_message(&mut self, message: ChatMessage, capacity: usize) {
        self.messages.push_back(message);
        while self.messages.len() > capacity {
            self.messages.pop_front();
        }
    }

    pub fn recent_messages(&self, limit: usize) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(limit);
        self.messages.iter().skip(skip).cloned().collect()
    }
}
