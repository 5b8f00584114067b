//! In-memory conversation sessions.

use coursemate_llm::Role;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Sessions kept when no explicit cap is configured.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// One remembered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Default)]
struct Sessions {
    messages: HashMap<String, Vec<SessionMessage>>,
    /// Session ids, oldest first
    order: VecDeque<String>,
}

/// Conversation history per session id.
///
/// Each session keeps at most `max_history` question/answer exchanges;
/// older messages are dropped as new ones arrive. At most `max_sessions`
/// sessions are held; starting one more evicts the oldest. Safe to share
/// between concurrent requests.
#[derive(Debug)]
pub struct SessionManager {
    max_history: usize,
    max_sessions: usize,
    sessions: Mutex<Sessions>,
}

impl SessionManager {
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            max_sessions: DEFAULT_MAX_SESSIONS,
            sessions: Mutex::new(Sessions::default()),
        }
    }

    /// Cap the number of sessions held at once (at least one).
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Start an empty session and return its id.
    pub fn create_session(&self) -> String {
        let session_id = format!("session-{}", uuid::Uuid::new_v4());
        let mut sessions = self.lock();
        self.insert_session(&mut sessions, &session_id);
        tracing::debug!("Created session {}", session_id);
        session_id
    }

    /// Append a message, creating the session if it does not exist yet.
    pub fn add_message(&self, session_id: &str, role: Role, content: &str) {
        let limit = self.max_history * 2;
        let mut sessions = self.lock();
        if !sessions.messages.contains_key(session_id) {
            self.insert_session(&mut sessions, session_id);
        }

        let Some(messages) = sessions.messages.get_mut(session_id) else {
            return;
        };

        messages.push(SessionMessage {
            role,
            content: content.to_string(),
        });

        if messages.len() > limit {
            let excess = messages.len() - limit;
            messages.drain(..excess);
        }
    }

    /// Record one question and its answer.
    pub fn add_exchange(&self, session_id: &str, question: &str, answer: &str) {
        self.add_message(session_id, Role::User, question);
        self.add_message(session_id, Role::Assistant, answer);
    }

    /// Remembered messages as `User: ...` / `Assistant: ...` lines, or `None`
    /// when the session is unknown or empty.
    pub fn get_conversation_history(&self, session_id: &str) -> Option<String> {
        let sessions = self.lock();
        let messages = sessions.messages.get(session_id)?;
        if messages.is_empty() {
            return None;
        }

        let lines: Vec<String> = messages
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    Role::User => "User",
                    Role::Assistant => "Assistant",
                };
                format!("{}: {}", speaker, m.content)
            })
            .collect();

        Some(lines.join("\n"))
    }

    /// Forget a session's messages.
    pub fn clear_session(&self, session_id: &str) {
        if let Some(messages) = self.lock().messages.get_mut(session_id) {
            messages.clear();
        }
    }

    pub fn session_count(&self) -> usize {
        self.lock().messages.len()
    }

    fn insert_session(&self, sessions: &mut Sessions, session_id: &str) {
        while sessions.order.len() >= self.max_sessions {
            let Some(oldest) = sessions.order.pop_front() else {
                break;
            };
            sessions.messages.remove(&oldest);
            tracing::debug!("Evicted session {}", oldest);
        }

        sessions.order.push_back(session_id.to_string());
        sessions.messages.insert(session_id.to_string(), Vec::new());
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(2)
    }
}
