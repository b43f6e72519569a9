//! Rule-based budgeting assistant
//!
//! Replies come from an ordered keyword table. Conversation history lives in
//! a [`ChatSessionStore`] owned by the caller, keyed by user and trimmed to
//! the most recent [`MAX_HISTORY_ENTRIES`] messages. At most [`MAX_SESSIONS`]
//! users are remembered; the least recently active one is dropped first.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum messages kept per user (user and assistant turns both count)
pub const MAX_HISTORY_ENTRIES: usize = 20;

/// Default number of users whose history is kept
pub const MAX_SESSIONS: usize = 1000;

/// Longest accepted chat message, in characters
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Session key used when a request names no user
pub const ANONYMOUS_USER: &str = "default";

/// First keyword contained in the lowercased message picks the reply
static CANNED_REPLIES: &[(&str, &str)] = &[
    (
        "budget",
        "Based on the 50/30/20 rule: spend 50% on needs (rent, food, utilities), 30% on wants \
         (entertainment, dining), and 20% on savings and goals. Would you like specific \
         allocations for your income?",
    ),
    (
        "save",
        "Here are top money-saving tips: (1) Track every expense, (2) Cut unnecessary \
         subscriptions, (3) Use the 50/30/20 budget rule, (4) Build an emergency fund, (5) Meal \
         prep instead of dining out. Which area interests you?",
    ),
    (
        "category",
        "Common expense categories: Needs (Groceries, Utilities, Rent, Insurance), Wants \
         (Dining, Entertainment, Shopping, Hobbies), Savings (Emergency Fund, Investments). What \
         expenses are you categorizing?",
    ),
    (
        "afford",
        "To check if you can afford something: (1) Check your remaining monthly budget, (2) \
         Ensure it aligns with your spending category, (3) Consider if it's a need or want, (4) \
         Look at your savings goals. What are you considering?",
    ),
    (
        "goal",
        "To set financial goals: (1) Define what you want (emergency fund, vacation, \
         investment), (2) Set a target amount and timeline, (3) Calculate monthly savings \
         needed, (4) Track progress in Finora. What goal do you want to set?",
    ),
    (
        "spending",
        "I can help analyze your spending! Please share: (1) Your monthly income, (2) Major \
         spending categories and amounts. Then I'll show you if you're on track with the \
         50/30/20 rule.",
    ),
    (
        "debt",
        "Debt management strategy: (1) List all debts with interest rates, (2) Consider debt \
         snowball (smallest first) or avalanche (highest rate first), (3) Make minimum payments \
         on all, (4) Put extra funds toward priority debt. Tell me about your debts?",
    ),
    (
        "invest",
        "Investment basics: Start with high-yield savings accounts for emergency funds, then \
         consider index funds or ETFs for long-term growth. Consult a financial advisor for \
         personalized advice based on your risk tolerance.",
    ),
];

const HELP_REPLY: &str = "I'm your budget assistant! I can help with:
• Budget allocation (50/30/20 rule)
• Expense categorization
• Spending analysis
• Money-saving tips
• Financial goal setting

What would you like help with?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Session {
    messages: Vec<ChatMessage>,
    last_active: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    by_user: HashMap<String, Session>,
    clock: u64,
}

/// Per-user conversation history
#[derive(Debug)]
pub struct ChatSessionStore {
    sessions: RwLock<Sessions>,
    capacity: usize,
}

impl Default for ChatSessionStore {
    fn default() -> Self {
        Self::with_capacity(MAX_SESSIONS)
    }
}

impl ChatSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store remembering at most `capacity` users (minimum one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            capacity: capacity.max(1),
        }
    }

    /// Number of users with stored history
    pub fn len(&self) -> usize {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append messages to a user's history, keeping the most recent entries
    ///
    /// A new user arriving at a full store evicts the least recently active one.
    pub fn append(&self, user: &str, messages: impl IntoIterator<Item = ChatMessage>) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());

        if !sessions.by_user.contains_key(user) && sessions.by_user.len() >= self.capacity {
            let oldest = sessions
                .by_user
                .iter()
                .min_by_key(|(_, session)| session.last_active)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                sessions.by_user.remove(&key);
            }
        }

        sessions.clock += 1;
        let now = sessions.clock;
        let session = sessions.by_user.entry(user.to_string()).or_default();
        session.last_active = now;

        let history = &mut session.messages;
        history.extend(messages);
        if history.len() > MAX_HISTORY_ENTRIES {
            let excess = history.len() - MAX_HISTORY_ENTRIES;
            history.drain(..excess);
        }
    }

    /// A user's history, oldest first (empty if unknown)
    pub fn history(&self, user: &str) -> Vec<ChatMessage> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .by_user
            .get(user)
            .map(|session| session.messages.clone())
            .unwrap_or_default()
    }

    /// Drop a user's history; returns whether there was any
    pub fn clear(&self, user: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.by_user.remove(user).is_some()
    }
}

/// Reject empty or overlong messages
pub fn validate_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(Error::InvalidData("Message cannot be empty".into()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(Error::InvalidData(format!(
            "Message too long (max {} characters)",
            MAX_MESSAGE_CHARS
        )));
    }
    Ok(())
}

/// Pick the canned reply for a message, or the help text
pub fn canned_reply(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    CANNED_REPLIES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, reply)| *reply)
        .unwrap_or(HELP_REPLY)
}

/// Answer a message and record the exchange in `store`
pub fn reply(store: &ChatSessionStore, user: &str, message: &str) -> ChatReply {
    let now = Utc::now();
    let answer = canned_reply(message);

    store.append(
        user,
        [
            ChatMessage {
                role: ChatRole::User,
                content: message.to_string(),
                timestamp: now,
            },
            ChatMessage {
                role: ChatRole::Assistant,
                content: answer.to_string(),
                timestamp: now,
            },
        ],
    );

    ChatReply {
        reply: answer.to_string(),
        status: "success".to_string(),
        timestamp: now,
    }
}
