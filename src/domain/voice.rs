use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceType {
    #[default]
    Female,
    Male,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Voice (TTS) call options (`voiceOptions`).
pub struct VoiceOption {
    #[serde(default)]
    pub voice_type: VoiceType,
    /// Played before the message text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_message: Option<String>,
    /// Played after the message text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_message: Option<String>,
    /// Keypad digits `1..=reply_range` the recipient may press.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_range: Option<u8>,
    /// Number connected when the recipient presses `0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counselor_number: Option<String>,
}

impl VoiceOption {
    pub const REPLY_RANGE_MAX: u8 = 9;

    pub fn new(voice_type: VoiceType) -> Self {
        Self {
            voice_type,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(range) = self.reply_range {
            if !(1..=Self::REPLY_RANGE_MAX).contains(&range) {
                return Err(ValidationError::OutOfRange {
                    field: "replyRange",
                    min: 1,
                    max: i64::from(Self::REPLY_RANGE_MAX),
                    actual: i64::from(range),
                });
            }
            if self.counselor_number.is_some() {
                return Err(ValidationError::ConflictingFields {
                    first: "replyRange",
                    second: "counselorNumber",
                });
            }
        }
        if let Some(number) = &self.counselor_number {
            if !number.chars().any(|c| c.is_ascii_digit()) {
                return Err(ValidationError::Empty {
                    field: "counselorNumber",
                });
            }
        }
        Ok(())
    }
}
