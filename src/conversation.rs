//! Conversation state machine
//!
//! One conversation per session. The transcript only ever grows; a send is a
//! two-step transition:
//!
//! ```text
//! Idle --begin_send--> Awaiting { pending } --settle--> Idle
//! ```
//!
//! `begin_send` appends the user message right away and hands back a
//! [`PendingSend`] token. `settle` consumes the token and appends either the
//! backend reply or the fixed fallback. Only one token can be outstanding.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{Backend, ChatRequest};
use crate::chart::ChartSnapshot;
use crate::error::{ClientError, Result};
use crate::notify::{self, Notice, Notifier};

/// Appended in place of a reply when the chat request fails
pub const FALLBACK_REPLY: &str =
    "I apologize, but I encountered an error. Please try asking your question again.";

/// Shown as a transient notice when the chat request fails
pub const FAILURE_NOTICE: &str = "Failed to get response. Please try again.";

/// Topic steering sent with every chat message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusContext {
    #[default]
    General,
    Career,
    Marriage,
    Finance,
    Health,
    Education,
    Spiritual,
}

impl FocusContext {
    pub const ALL: [FocusContext; 7] = [
        FocusContext::General,
        FocusContext::Career,
        FocusContext::Marriage,
        FocusContext::Finance,
        FocusContext::Health,
        FocusContext::Education,
        FocusContext::Spiritual,
    ];

    /// Wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusContext::General => "general",
            FocusContext::Career => "career",
            FocusContext::Marriage => "marriage",
            FocusContext::Finance => "finance",
            FocusContext::Health => "health",
            FocusContext::Education => "education",
            FocusContext::Spiritual => "spiritual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FocusContext::General => "General Guidance",
            FocusContext::Career => "Career & Profession",
            FocusContext::Marriage => "Marriage & Relationships",
            FocusContext::Finance => "Finance & Wealth",
            FocusContext::Health => "Health & Wellbeing",
            FocusContext::Education => "Education & Learning",
            FocusContext::Spiritual => "Spiritual Growth",
        }
    }

    /// Quick questions offered for this focus
    pub fn suggested_questions(&self) -> &'static [&'static str] {
        match self {
            FocusContext::General => &[
                "Give me an overview of my birth chart",
                "What are my strengths according to my planets?",
                "What life lessons should I focus on?",
            ],
            FocusContext::Career => &[
                "What does my chart say about my career prospects?",
                "When is a good time for a job change?",
                "What career path suits me best according to my chart?",
            ],
            FocusContext::Marriage => &[
                "What does my 7th house indicate about marriage?",
                "When is a favorable time for marriage?",
                "How can I improve my relationships?",
            ],
            FocusContext::Finance => &[
                "What are my financial prospects?",
                "When should I invest or start a business?",
                "What remedies can improve my wealth?",
            ],
            FocusContext::Health => &[
                "What does my 6th house say about my health?",
                "Which planets affect my wellbeing the most?",
                "What practices can support my health?",
            ],
            FocusContext::Education => &[
                "What fields of study suit my chart?",
                "How does Mercury influence my learning?",
                "Is this a good period for higher education?",
            ],
            FocusContext::Spiritual => &[
                "What does my 12th house reveal about my spiritual path?",
                "Which mantras or practices suit my chart?",
                "What is my Moon nakshatra teaching me?",
            ],
        }
    }
}

impl fmt::Display for FocusContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FocusContext {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FocusContext::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = FocusContext::ALL.iter().map(|c| c.as_str()).collect();
                format!("unknown focus '{}' (expected one of: {})", s.trim(), names.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only message list
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    fn append(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}

/// Opening assistant message built from the chart
pub fn greeting(chart: &ChartSnapshot) -> String {
    format!(
        "Namaste! 🙏 I've analyzed your birth chart. Your ascendant is {}, and your Moon is in {} in the {} Nakshatra. I'm here to provide guidance on your life path. What would you like to explore today?",
        chart.ascendant.sign,
        chart.moon_sign().unwrap_or("an unrecorded sign"),
        chart.moon_nakshatra.name,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendState {
    Idle,
    Awaiting { pending: Uuid },
}

/// Token for a send that has been appended but not yet answered
#[derive(Debug)]
pub struct PendingSend {
    conversation: Uuid,
    message: Uuid,
    request: ChatRequest,
}

impl PendingSend {
    /// The request to put on the wire
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Id of the optimistic user message
    pub fn message_id(&self) -> Uuid {
        self.message
    }
}

/// How a send ended
#[derive(Debug)]
pub enum Settled {
    Answered,
    Failed(ClientError),
}

impl Settled {
    pub fn is_answered(&self) -> bool {
        matches!(self, Settled::Answered)
    }
}

/// Transcript plus send state for one session
#[derive(Debug)]
pub struct Conversation {
    id: Uuid,
    session_id: String,
    transcript: Transcript,
    focus: FocusContext,
    state: SendState,
}

impl Conversation {
    /// Fresh conversation seeded with the chart greeting
    pub fn new(session_id: impl Into<String>, chart: &ChartSnapshot) -> Self {
        let mut transcript = Transcript::default();
        transcript.append(Message::new(Role::Assistant, greeting(chart)));

        Self {
            id: Uuid::new_v4(),
            session_id: session_id.into(),
            transcript,
            focus: FocusContext::default(),
            state: SendState::Idle,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn focus(&self) -> FocusContext {
        self.focus
    }

    /// Applies to sends that start after this call
    pub fn set_focus(&mut self, focus: FocusContext) {
        debug!("focus {} -> {}", self.focus, focus);
        self.focus = focus;
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        self.focus.suggested_questions()
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, SendState::Awaiting { .. })
    }

    /// Append the user message and move to `Awaiting`
    pub fn begin_send(&mut self, text: &str) -> Result<PendingSend> {
        if self.is_awaiting() {
            return Err(ClientError::SendInFlight);
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        let message = self.transcript.append(Message::new(Role::User, text)).id;
        self.state = SendState::Awaiting { pending: message };
        debug!("chat send pending (focus: {})", self.focus);

        Ok(PendingSend {
            conversation: self.id,
            message,
            request: ChatRequest {
                session_id: self.session_id.clone(),
                message: text.to_string(),
                context: self.focus,
            },
        })
    }

    /// Commit the reply or record the failure, then return to `Idle`
    pub fn settle(
        &mut self,
        pending: PendingSend,
        outcome: Result<String>,
        notifier: &dyn Notifier,
    ) -> Result<Settled> {
        let matches_state = self.state == SendState::Awaiting { pending: pending.message };
        if pending.conversation != self.id || !matches_state {
            return Err(ClientError::StalePending);
        }
        self.state = SendState::Idle;

        match outcome {
            Ok(reply) => {
                self.transcript.append(Message::new(Role::Assistant, reply));
                Ok(Settled::Answered)
            }
            Err(err) => {
                warn!("chat request failed: {}", err);
                self.transcript.append(Message::new(Role::Assistant, FALLBACK_REPLY));
                notify::emit(notifier, Notice::error(FAILURE_NOTICE));
                Ok(Settled::Failed(err))
            }
        }
    }

    /// Full send: optimistic append, one backend call, settle
    pub async fn send(
        &mut self,
        backend: &dyn Backend,
        text: &str,
        notifier: &dyn Notifier,
    ) -> Result<Settled> {
        let pending = self.begin_send(text)?;
        let outcome = backend
            .chat(pending.request())
            .await
            .map(|resp| resp.response);
        self.settle(pending, outcome, notifier)
    }

    /// Send the `index`-th suggested question for the current focus
    pub async fn ask_suggested(
        &mut self,
        backend: &dyn Backend,
        index: usize,
        notifier: &dyn Notifier,
    ) -> Result<Settled> {
        let question = self
            .suggestions()
            .get(index)
            .copied()
            .ok_or(ClientError::NoSuchSuggestion(index))?;
        self.send(backend, question, notifier).await
    }
}
