use std::time::{Duration, Instant};

/// Severity of a message; it decides the log level the message is recorded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

impl MessageType {
    fn log_level(self) -> log::Level {
        match self {
            MessageType::Info => log::Level::Debug,
            MessageType::Warning => log::Level::Warn,
            MessageType::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub created_at: Instant,
}

impl StatusMessage {
    pub fn new(content: String) -> Self {
        Self {
            content,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.created_at.elapsed() >= timeout
    }
}

/// The message bar. A message stays visible for `timeout` after it is set;
/// expiry is only checked when the bar is drawn.
#[derive(Debug, Clone)]
pub struct StatusManager {
    current_message: Option<StatusMessage>,
    timeout: Duration,
}

impl StatusManager {
    pub fn new(timeout: Duration) -> Self {
        Self {
            current_message: None,
            timeout,
        }
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Info);
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Warning);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Error);
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    /// The message text, if it is still young enough to show.
    pub fn visible_message(&self) -> Option<&str> {
        self.current_message
            .as_ref()
            .filter(|m| !m.content.is_empty() && !m.is_expired(self.timeout))
            .map(|m| m.content.as_str())
    }

    fn set(&mut self, content: String, message_type: MessageType) {
        log::log!(message_type.log_level(), "status: {content}");
        self.current_message = Some(StatusMessage::new(content));
    }
}

impl Default for StatusManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
