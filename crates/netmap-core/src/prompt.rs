//! Operator dialogs and transient notifications.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Asks the operator for input.
pub trait UserPrompt {
    /// Ask for a line of text. `None` means the operator cancelled.
    fn ask_text(&mut self, label: &str, default: &str) -> Option<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Shows short toast messages to the operator.
pub trait Notifier {
    /// `duration_ms` of `None` leaves the display time to the notifier.
    fn notify(&mut self, message: &str, level: NotifyLevel, duration_ms: Option<u64>);
}

/// A prompt that replays pre-recorded answers.
///
/// Once the recorded answers run out, text prompts are cancelled and
/// confirmations are declined.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    texts: VecDeque<Option<String>>,
    confirms: VecDeque<bool>,
    asked: Vec<String>,
    /// Pre-filled answer of each text prompt.
    defaults: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next text prompt.
    pub fn answer_text(&mut self, answer: Option<&str>) -> &mut Self {
        self.texts.push_back(answer.map(str::to_string));
        self
    }

    /// Queue the answer to the next confirmation.
    pub fn answer_confirm(&mut self, answer: bool) -> &mut Self {
        self.confirms.push_back(answer);
        self
    }

    /// Every question asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Pre-filled answers offered by the text prompts so far, in order.
    pub fn text_defaults(&self) -> &[String] {
        &self.defaults
    }

    /// Answers that were never consumed.
    pub fn pending(&self) -> usize {
        self.texts.len() + self.confirms.len()
    }
}

impl UserPrompt for ScriptedPrompt {
    fn ask_text(&mut self, label: &str, default: &str) -> Option<String> {
        self.asked.push(label.to_string());
        self.defaults.push(default.to_string());
        self.texts.pop_front().flatten()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.confirms.pop_front().unwrap_or(false)
    }
}

/// A notification as delivered to a [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub level: NotifyLevel,
    pub duration_ms: Option<u64>,
}

/// Notifier that keeps everything it was asked to show.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Number of notifications whose message equals `message`.
    pub fn count(&self, message: &str) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.message == message)
            .count()
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str, level: NotifyLevel, duration_ms: Option<u64>) {
        self.notifications.push(Notification {
            message: message.to_string(),
            level,
            duration_ms,
        });
    }
}
