use phonenumber::country;
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number in the digits-only form SOLAPI expects (`to` / `from`).
///
/// Invariant: non-empty, ASCII digits only. Separators such as hyphens, spaces,
/// dots, parentheses and a leading `+` are stripped on construction.
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// JSON field name used for recipients (`to`).
    pub const FIELD: &'static str = "to";

    /// Normalize a phone number by dropping every non-digit character.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        Self::for_field(Self::FIELD, value)
    }

    pub(crate) fn for_field(
        field: &'static str,
        value: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let digits: String = value
            .as_ref()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.is_empty() {
            return Err(ValidationError::Empty { field });
        }
        Ok(Self(digits))
    }

    /// Digits as sent to SOLAPI.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ParsedPhoneNumber> for PhoneNumber {
    /// Use the national significant form (with trunk prefix), e.g. `01012345678`.
    fn from(value: ParsedPhoneNumber) -> Self {
        Self(value.national_digits)
    }
}

#[derive(Debug, Clone)]
/// Phone number parsed with the `phonenumber` crate.
///
/// Useful when input arrives in international notation (`+82 10-1234-5678`);
/// converting into [`PhoneNumber`] yields the national digits SOLAPI expects,
/// while [`ParsedPhoneNumber::country_code`] feeds the message `country` field.
///
/// Equality and hashing are based on the E.164 form.
pub struct ParsedPhoneNumber {
    e164: String,
    national_digits: String,
    parsed: phonenumber::PhoneNumber,
}

impl ParsedPhoneNumber {
    /// Parse a phone number.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty {
                field: PhoneNumber::FIELD,
            });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        let national_digits = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::National)
            .to_string()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();

        Ok(Self {
            e164,
            national_digits,
            parsed,
        })
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// Country calling code, e.g. `82` for Korea.
    pub fn country_code(&self) -> u16 {
        self.parsed.code().value()
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for ParsedPhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for ParsedPhoneNumber {}

impl std::hash::Hash for ParsedPhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
/// Message channel (`type`).
pub enum MessageType {
    /// Short text message (under 80 bytes).
    Sms,
    /// Long text message.
    Lms,
    /// Multimedia message with an uploaded image.
    Mms,
    /// Kakao Alimtalk (template based).
    Ata,
    /// Kakao FriendTalk, text.
    Cta,
    /// Kakao FriendTalk, image.
    Cti,
    /// Voice (TTS) call.
    Voice,
    /// Kakao brand message, free-form chat bubble.
    BmsFree,
}

impl MessageType {
    /// Wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sms => "SMS",
            Self::Lms => "LMS",
            Self::Mms => "MMS",
            Self::Ata => "ATA",
            Self::Cta => "CTA",
            Self::Cti => "CTI",
            Self::Voice => "VOICE",
            Self::BmsFree => "BMS_FREE",
        }
    }

    /// Whether this type is delivered through a Kakao channel.
    pub fn is_kakao(self) -> bool {
        matches!(self, Self::Ata | Self::Cta | Self::Cti | Self::BmsFree)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Storage bucket for uploaded files.
///
/// The gateway enforces per-bucket image ratio and size rules.
pub enum StorageType {
    Kakao,
    Mms,
    Document,
    Rcs,
    Fax,
    Bms,
    BmsWide,
    BmsWideMainItemList,
    BmsWideSubItemList,
    BmsCarouselFeedList,
    BmsCarouselCommerceList,
}
