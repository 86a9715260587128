use std::collections::BTreeMap;

use crate::domain::kakao::KakaoOption;
use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageType, ParsedPhoneNumber, PhoneNumber};
use crate::domain::voice::VoiceOption;

/// Default `country` calling code (Korea).
pub const DEFAULT_COUNTRY: &str = "82";

/// Texts strictly shorter than this many UTF-8 bytes are sent as SMS.
pub const SMS_MAX_BYTES: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Channel specific option block. A message carries at most one.
pub enum ChannelOptions {
    Kakao(KakaoOption),
    Voice(VoiceOption),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single outbound message.
///
/// Construct with [`Message::builder`]. Phone numbers are stored in digits-only
/// form and the option block has already been validated against the explicit
/// type, if any.
pub struct Message {
    message_type: Option<MessageType>,
    to: PhoneNumber,
    from: Option<PhoneNumber>,
    text: Option<String>,
    subject: Option<String>,
    image_id: Option<String>,
    auto_type_detect: bool,
    country: String,
    custom_fields: BTreeMap<String, String>,
    options: Option<ChannelOptions>,
}

impl Message {
    pub fn builder(to: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(to)
    }

    /// Shorthand for a plain text message with auto-detected type.
    pub fn plain(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::builder(to).from(from).text(text).build()
    }

    /// Explicit type, if one was set.
    pub fn message_type(&self) -> Option<MessageType> {
        self.message_type
    }

    /// Channel type this message will be delivered with, as far as it can be
    /// decided locally.
    ///
    /// An explicit type always wins. Otherwise, with auto detection enabled and
    /// no Kakao or voice block: an image makes it MMS, text under
    /// [`SMS_MAX_BYTES`] UTF-8 bytes is SMS and anything longer is LMS. In every
    /// other case the gateway decides and `None` is returned.
    pub fn resolved_type(&self) -> Option<MessageType> {
        if let Some(explicit) = self.message_type {
            return Some(explicit);
        }
        if !self.auto_type_detect || self.options.is_some() {
            return None;
        }
        if self.image_id.is_some() {
            return Some(MessageType::Mms);
        }
        let bytes = self.text.as_deref().map_or(0, str::len);
        if bytes < SMS_MAX_BYTES {
            Some(MessageType::Sms)
        } else {
            Some(MessageType::Lms)
        }
    }

    pub fn to(&self) -> &PhoneNumber {
        &self.to
    }

    pub fn from(&self) -> Option<&PhoneNumber> {
        self.from.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn image_id(&self) -> Option<&str> {
        self.image_id.as_deref()
    }

    pub fn auto_type_detect(&self) -> bool {
        self.auto_type_detect
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn custom_fields(&self) -> &BTreeMap<String, String> {
        &self.custom_fields
    }

    pub fn options(&self) -> Option<&ChannelOptions> {
        self.options.as_ref()
    }

    pub fn kakao_options(&self) -> Option<&KakaoOption> {
        match &self.options {
            Some(ChannelOptions::Kakao(kakao)) => Some(kakao),
            _ => None,
        }
    }

    pub fn voice_options(&self) -> Option<&VoiceOption> {
        match &self.options {
            Some(ChannelOptions::Voice(voice)) => Some(voice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`Message`].
pub struct MessageBuilder {
    message_type: Option<MessageType>,
    to: String,
    from: Option<String>,
    text: Option<String>,
    subject: Option<String>,
    image_id: Option<String>,
    auto_type_detect: bool,
    country: String,
    custom_fields: BTreeMap<String, String>,
    kakao_options: Option<KakaoOption>,
    voice_options: Option<VoiceOption>,
}

impl MessageBuilder {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            message_type: None,
            to: to.into(),
            from: None,
            text: None,
            subject: None,
            image_id: None,
            auto_type_detect: true,
            country: DEFAULT_COUNTRY.to_owned(),
            custom_fields: BTreeMap::new(),
            kakao_options: None,
            voice_options: None,
        }
    }

    /// Set the recipient from a parsed international number; also sets
    /// `country` from its calling code.
    pub fn recipient(mut self, number: ParsedPhoneNumber) -> Self {
        self.country = number.country_code().to_string();
        self.to = PhoneNumber::from(number).as_str().to_owned();
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = Some(message_type);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Title for LMS/MMS.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn image_id(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    pub fn auto_type_detect(mut self, enabled: bool) -> Self {
        self.auto_type_detect = enabled;
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Opaque key/value pair echoed back in delivery reports.
    pub fn custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    pub fn kakao_options(mut self, options: KakaoOption) -> Self {
        self.kakao_options = Some(options);
        self
    }

    pub fn voice_options(mut self, options: VoiceOption) -> Self {
        self.voice_options = Some(options);
        self
    }

    pub fn build(self) -> Result<Message, ValidationError> {
        let to = PhoneNumber::for_field("to", &self.to)?;
        let from = self
            .from
            .as_deref()
            .map(|from| PhoneNumber::for_field("from", from))
            .transpose()?;

        if self.country.is_empty() {
            return Err(ValidationError::Empty { field: "country" });
        }
        if !self.country.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidCountryCode {
                input: self.country,
            });
        }

        let options = match (self.kakao_options, self.voice_options) {
            (Some(_), Some(_)) => {
                return Err(ValidationError::ConflictingFields {
                    first: "kakaoOptions",
                    second: "voiceOptions",
                });
            }
            (Some(kakao), None) => {
                kakao.validate()?;
                Some(ChannelOptions::Kakao(kakao))
            }
            (None, Some(voice)) => {
                voice.validate()?;
                Some(ChannelOptions::Voice(voice))
            }
            (None, None) => None,
        };

        if let Some(message_type) = self.message_type {
            check_type_matches_options(message_type, options.as_ref())?;
        }

        Ok(Message {
            message_type: self.message_type,
            to,
            from,
            text: self.text,
            subject: self.subject,
            image_id: self.image_id,
            auto_type_detect: self.auto_type_detect,
            country: self.country,
            custom_fields: self.custom_fields,
            options,
        })
    }
}

fn check_type_matches_options(
    message_type: MessageType,
    options: Option<&ChannelOptions>,
) -> Result<(), ValidationError> {
    let ctx = message_type.as_str();
    match (message_type, options) {
        (MessageType::Voice, Some(ChannelOptions::Voice(_))) => Ok(()),
        (MessageType::Voice, Some(ChannelOptions::Kakao(_))) => {
            Err(ValidationError::ForbiddenField {
                field: "kakaoOptions",
                context: ctx,
            })
        }
        (MessageType::Voice, None) => Err(ValidationError::MissingField {
            field: "voiceOptions",
            context: ctx,
        }),
        (kind, Some(ChannelOptions::Kakao(kakao))) if kind.is_kakao() => {
            if kakao.pf_id.is_none() {
                return Err(ValidationError::MissingField {
                    field: "kakaoOptions.pfId",
                    context: ctx,
                });
            }
            if kind == MessageType::Ata && kakao.template_id.is_none() {
                return Err(ValidationError::MissingField {
                    field: "kakaoOptions.templateId",
                    context: ctx,
                });
            }
            match (kind == MessageType::BmsFree, kakao.has_chat_bubble()) {
                (true, false) => Err(ValidationError::MissingField {
                    field: "kakaoOptions.bms.chatBubbleType",
                    context: ctx,
                }),
                (false, true) => Err(ValidationError::ForbiddenField {
                    field: "kakaoOptions.bms.chatBubbleType",
                    context: ctx,
                }),
                _ => Ok(()),
            }
        }
        (kind, Some(ChannelOptions::Voice(_))) if kind.is_kakao() => {
            Err(ValidationError::ForbiddenField {
                field: "voiceOptions",
                context: ctx,
            })
        }
        (kind, None) if kind.is_kakao() => Err(ValidationError::MissingField {
            field: "kakaoOptions",
            context: ctx,
        }),
        (_, Some(ChannelOptions::Kakao(_))) => Err(ValidationError::ForbiddenField {
            field: "kakaoOptions",
            context: ctx,
        }),
        (_, Some(ChannelOptions::Voice(_))) => Err(ValidationError::ForbiddenField {
            field: "voiceOptions",
            context: ctx,
        }),
        (_, None) => Ok(()),
    }
}
