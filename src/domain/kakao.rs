use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::bms::KakaoBmsOption;
use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Alimtalk / FriendTalk button action (`buttonType`).
pub enum KakaoButtonType {
    #[serde(rename = "WL")]
    WebLink,
    #[serde(rename = "AL")]
    AppLink,
    #[serde(rename = "DS")]
    DeliveryTracking,
    #[serde(rename = "BK")]
    BotKeyword,
    #[serde(rename = "MD")]
    MessageDelivery,
    #[serde(rename = "BC")]
    Consultation,
    #[serde(rename = "BT")]
    BotTransfer,
    #[serde(rename = "AC")]
    ChannelAdd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KakaoButton {
    pub button_name: String,
    pub button_type: KakaoButtonType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_mo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_pc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_and: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_ios: Option<String>,
}

impl KakaoButton {
    pub fn new(button_type: KakaoButtonType, button_name: impl Into<String>) -> Self {
        Self {
            button_name: button_name.into(),
            button_type,
            link_mo: None,
            link_pc: None,
            link_and: None,
            link_ios: None,
        }
    }

    /// Web link button opening `link_mo` on mobile.
    pub fn web_link(button_name: impl Into<String>, link_mo: impl Into<String>) -> Self {
        Self {
            link_mo: Some(link_mo.into()),
            ..Self::new(KakaoButtonType::WebLink, button_name)
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.button_name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "buttons.buttonName",
            });
        }
        if self.button_type == KakaoButtonType::WebLink && self.link_mo.is_none() {
            return Err(ValidationError::MissingField {
                field: "buttons.linkMo",
                context: "WL button",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Kakao channel options (`kakaoOptions`).
///
/// Covers Alimtalk (template based), FriendTalk and brand messages. Use one of
/// the constructors and adjust the public fields as needed; the message
/// builder validates the combination.
pub struct KakaoOption {
    /// Kakao business channel id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pf_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Template substitutions, e.g. `#{name}` → `"홍길동"`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
    /// Do not fall back to SMS/LMS when Kakao delivery fails.
    #[serde(default)]
    pub disable_sms: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<KakaoButton>,
    /// FriendTalk image (uploaded with [`crate::StorageType::Kakao`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bms: Option<KakaoBmsOption>,
}

impl KakaoOption {
    /// Alimtalk message rendered from a registered template.
    pub fn alimtalk(pf_id: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            pf_id: Some(pf_id.into()),
            template_id: Some(template_id.into()),
            ..Self::default()
        }
    }

    /// FriendTalk message sent from a business channel.
    pub fn friend_talk(pf_id: impl Into<String>) -> Self {
        Self {
            pf_id: Some(pf_id.into()),
            ..Self::default()
        }
    }

    /// Brand message ("BMS Free") with the given chat bubble option.
    pub fn bms(pf_id: impl Into<String>, bms: KakaoBmsOption) -> Self {
        Self {
            pf_id: Some(pf_id.into()),
            bms: Some(bms),
            ..Self::default()
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Whether the option carries a BMS chat bubble (not just targeting).
    pub fn has_chat_bubble(&self) -> bool {
        self.bms
            .as_ref()
            .is_some_and(|bms| bms.chat_bubble_type().is_some())
    }

    /// Check rules that hold regardless of the message type.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(pf_id) = &self.pf_id {
            if pf_id.trim().is_empty() {
                return Err(ValidationError::Empty { field: "pfId" });
            }
        }
        if let Some(template_id) = &self.template_id {
            if template_id.trim().is_empty() {
                return Err(ValidationError::Empty {
                    field: "templateId",
                });
            }
            if self.has_chat_bubble() {
                return Err(ValidationError::ConflictingFields {
                    first: "templateId",
                    second: "bms.chatBubbleType",
                });
            }
        }
        for button in &self.buttons {
            button.validate()?;
        }
        Ok(())
    }
}
