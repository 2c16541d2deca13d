use crate::attachments::MAX_ATTACHMENT_BYTES;

pub const WELCOME_MESSAGE: &str = "Hi there! I'm your FitFusion assistant. Ask me about workouts, nutrition, recovery or tracking your progress.";

/// Static configuration for the assistant widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub max_attachment_bytes: u64,
    pub welcome_message: String,
    pub suggestions: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_attachment_bytes: MAX_ATTACHMENT_BYTES,
            welcome_message: WELCOME_MESSAGE.to_string(),
            suggestions: vec![
                "How often should I workout?".to_string(),
                "What should I eat after training?".to_string(),
                "How do I track my progress?".to_string(),
                "I'm feeling stuck, any tips?".to_string(),
            ],
        }
    }
}
