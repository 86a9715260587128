use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TransportError;
use crate::domain::{
    FailedMessage, GroupCount, GroupInfo, Instant, KakaoOption, Message, MessageStatus,
    MessageType, SendRequest, SendResponse, VoiceOption, format_instant, parse_instant,
};

/// `sdkVersion` reported in the `agent` block.
const SDK_VERSION: &str = concat!("rust/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub(super) struct MessageWire {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    message_type: Option<MessageType>,
    to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_id: Option<String>,
    #[serde(default = "default_auto_type_detect")]
    auto_type_detect: bool,
    #[serde(default = "default_country")]
    country: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    custom_fields: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kakao_options: Option<KakaoOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_options: Option<VoiceOption>,
}

#[cfg(test)]
fn default_auto_type_detect() -> bool {
    true
}

#[cfg(test)]
fn default_country() -> String {
    crate::domain::DEFAULT_COUNTRY.to_owned()
}

impl From<&Message> for MessageWire {
    fn from(message: &Message) -> Self {
        Self {
            message_type: message.message_type(),
            to: message.to().as_str().to_owned(),
            from: message.from().map(|from| from.as_str().to_owned()),
            text: message.text().map(str::to_owned),
            subject: message.subject().map(str::to_owned),
            image_id: message.image_id().map(str::to_owned),
            auto_type_detect: message.auto_type_detect(),
            country: message.country().to_owned(),
            custom_fields: message.custom_fields().clone(),
            kakao_options: message.kakao_options().cloned(),
            voice_options: message.voice_options().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
struct AgentWire {
    sdk_version: String,
    os_platform: String,
}

impl Default for AgentWire {
    fn default() -> Self {
        Self {
            sdk_version: SDK_VERSION.to_owned(),
            os_platform: format!("{} | {}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub(super) struct SendRequestWire {
    messages: Vec<MessageWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_date: Option<String>,
    show_message_list: bool,
    allow_duplicates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_id: Option<String>,
    #[serde(default)]
    agent: AgentWire,
}

/// Encode a batch into the `send-many/detail` request body.
pub fn encode_send_request(request: &SendRequest) -> Result<String, TransportError> {
    let config = request.config();
    let wire = SendRequestWire {
        messages: request.messages().iter().map(MessageWire::from).collect(),
        scheduled_date: config.scheduled_date.as_ref().map(format_instant),
        show_message_list: config.show_message_list,
        allow_duplicates: config.allow_duplicates,
        app_id: config.app_id.clone(),
        agent: AgentWire::default(),
    };
    Ok(serde_json::to_string(&wire)?)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
/// Code that the gateway sends either as a string or as a number.
pub(super) enum TransportCode {
    String(String),
    Number(serde_json::Number),
}

impl TransportCode {
    pub(super) fn into_string(self) -> String {
        match self {
            Self::String(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MessageStatusWire {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default, rename = "type")]
    message_type: Option<String>,
    #[serde(default)]
    status_code: Option<TransportCode>,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
}

impl MessageStatusWire {
    fn into_domain(self, message_id: String) -> Result<MessageStatus, TransportError> {
        Ok(MessageStatus {
            message_id,
            group_id: self.group_id,
            to: self.to,
            from: self.from,
            message_type: self.message_type,
            status_code: self.status_code.map(TransportCode::into_string),
            status_message: self.status_message,
            country: self.country,
            date_created: parse_optional_instant(self.date_created)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
/// `messageList` arrives keyed by message id from some endpoints and as a
/// plain array from others.
pub(super) enum MessageListWire {
    Map(BTreeMap<String, MessageStatusWire>),
    List(Vec<MessageStatusWire>),
}

impl MessageListWire {
    pub(super) fn into_domain(self) -> Result<BTreeMap<String, MessageStatus>, TransportError> {
        let mut out = BTreeMap::new();
        match self {
            Self::Map(entries) => {
                for (key, entry) in entries {
                    let id = entry.message_id.clone().unwrap_or_else(|| key.clone());
                    out.insert(key, entry.into_domain(id)?);
                }
            }
            Self::List(entries) => {
                for mut entry in entries {
                    let id = entry
                        .message_id
                        .take()
                        .ok_or(TransportError::MissingMessageId)?;
                    out.insert(id.clone(), entry.into_domain(id)?);
                }
            }
        }
        Ok(out)
    }
}

pub(super) fn parse_optional_instant(
    value: Option<String>,
) -> Result<Option<Instant>, TransportError> {
    Ok(value.as_deref().map(parse_instant).transpose()?)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GroupCountWire {
    total: u32,
    sent_total: u32,
    sent_failed: u32,
    sent_success: u32,
    sent_pending: u32,
    sent_replacement: u32,
    refund: u32,
    registered_failed: u32,
    registered_success: u32,
}

impl From<GroupCountWire> for GroupCount {
    fn from(value: GroupCountWire) -> Self {
        Self {
            total: value.total,
            sent_total: value.sent_total,
            sent_failed: value.sent_failed,
            sent_success: value.sent_success,
            sent_pending: value.sent_pending,
            sent_replacement: value.sent_replacement,
            refund: value.refund,
            registered_failed: value.registered_failed,
            registered_success: value.registered_success,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupInfoWire {
    group_id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    count: GroupCountWire,
    #[serde(default)]
    scheduled_date: Option<String>,
    #[serde(default)]
    app_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FailedMessageWire {
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default, rename = "type")]
    message_type: Option<String>,
    status_code: TransportCode,
    #[serde(default)]
    status_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponseWire {
    group_info: GroupInfoWire,
    #[serde(default)]
    message_list: Option<MessageListWire>,
    #[serde(default)]
    failed_message_list: Vec<FailedMessageWire>,
}

pub fn decode_send_response(json: &str) -> Result<SendResponse, TransportError> {
    let parsed: SendResponseWire = serde_json::from_str(json)?;

    let message_list = match parsed.message_list {
        Some(list) => list.into_domain()?,
        None => BTreeMap::new(),
    };
    let failed_message_list: Vec<FailedMessage> = parsed
        .failed_message_list
        .into_iter()
        .map(|failed| FailedMessage {
            to: failed.to,
            from: failed.from,
            message_type: failed.message_type,
            status_code: failed.status_code.into_string(),
            status_message: failed.status_message,
        })
        .collect();

    let group = parsed.group_info;
    debug!(
        group_id = %group.group_id,
        total = group.count.total,
        listed = message_list.len(),
        failed = failed_message_list.len(),
        "decoded send response"
    );

    Ok(SendResponse {
        group_info: GroupInfo {
            group_id: group.group_id,
            status: group.status,
            count: group.count.into(),
            scheduled_date: parse_optional_instant(group.scheduled_date)?,
            app_id: group.app_id,
        },
        message_list,
        failed_message_list,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error body returned with a non-2xx status.
pub struct RemoteError {
    pub error_code: String,
    pub error_message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBodyWire {
    error_code: TransportCode,
    #[serde(default)]
    error_message: Option<String>,
}

/// Decode `{ errorCode, errorMessage }`; `None` when the body has another shape.
pub fn decode_error_body(body: &str) -> Option<RemoteError> {
    let parsed: ErrorBodyWire = serde_json::from_str(body).ok()?;
    Some(RemoteError {
        error_code: parsed.error_code.into_string(),
        error_message: parsed.error_message.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{
        BmsBubble, BmsText, KakaoBmsOption, KakaoBmsTargeting, SendRequestConfig, VoiceType,
    };

    fn message_from_wire(wire: MessageWire) -> Result<Message, TransportError> {
        let mut builder = Message::builder(wire.to)
            .auto_type_detect(wire.auto_type_detect)
            .country(wire.country);
        if let Some(message_type) = wire.message_type {
            builder = builder.message_type(message_type);
        }
        if let Some(from) = wire.from {
            builder = builder.from(from);
        }
        if let Some(text) = wire.text {
            builder = builder.text(text);
        }
        if let Some(subject) = wire.subject {
            builder = builder.subject(subject);
        }
        if let Some(image_id) = wire.image_id {
            builder = builder.image_id(image_id);
        }
        for (key, value) in wire.custom_fields {
            builder = builder.custom_field(key, value);
        }
        if let Some(kakao) = wire.kakao_options {
            builder = builder.kakao_options(kakao);
        }
        if let Some(voice) = wire.voice_options {
            builder = builder.voice_options(voice);
        }
        Ok(builder.build()?)
    }

    fn decode_send_request(json: &str) -> Result<SendRequest, TransportError> {
        let wire: SendRequestWire = serde_json::from_str(json)?;
        let messages = wire
            .messages
            .into_iter()
            .map(message_from_wire)
            .collect::<Result<Vec<_>, _>>()?;
        let config = SendRequestConfig {
            app_id: wire.app_id,
            allow_duplicates: wire.allow_duplicates,
            show_message_list: wire.show_message_list,
            scheduled_date: parse_optional_instant(wire.scheduled_date)?,
        };
        Ok(SendRequest::new(messages, config)?)
    }

    fn encode_value(request: &SendRequest) -> Value {
        serde_json::from_str(&encode_send_request(request).unwrap()).unwrap()
    }

    #[test]
    fn plain_message_emits_defaults_and_omits_nulls() {
        let message = Message::plain("02-930-2266", "010-1234-5678", "hello").unwrap();
        let value = encode_value(&SendRequest::single(message));

        assert_eq!(
            value["messages"],
            json!([{
                "to": "01012345678",
                "from": "029302266",
                "text": "hello",
                "autoTypeDetect": true,
                "country": "82"
            }])
        );
        assert_eq!(value["allowDuplicates"], json!(false));
        assert_eq!(value["showMessageList"], json!(false));
        assert!(value.get("scheduledDate").is_none());
        assert!(value.get("appId").is_none());
        assert_eq!(value["agent"]["sdkVersion"], json!(SDK_VERSION));
        assert!(value["agent"]["osPlatform"].is_string());
    }

    #[test]
    fn config_fields_are_encoded() {
        let config = SendRequestConfig {
            app_id: Some("APP1".to_owned()),
            allow_duplicates: true,
            show_message_list: true,
            scheduled_date: Some(parse_instant("2024-06-15T14:30:00.123456789Z").unwrap()),
        };
        let message = Message::plain("029302266", "01012345678", "hello").unwrap();
        let request = SendRequest::new(vec![message], config).unwrap();
        let value = encode_value(&request);

        assert_eq!(value["appId"], json!("APP1"));
        assert_eq!(value["allowDuplicates"], json!(true));
        assert_eq!(value["showMessageList"], json!(true));
        assert_eq!(
            value["scheduledDate"],
            json!("2024-06-15T14:30:00.123456789Z")
        );
    }

    #[test]
    fn only_explicit_type_is_sent() {
        let auto = Message::plain("029302266", "01012345678", "hi").unwrap();
        let explicit = Message::builder("01012345678")
            .message_type(MessageType::Lms)
            .subject("제목")
            .text("hi")
            .build()
            .unwrap();
        let request = SendRequest::new(vec![auto, explicit], SendRequestConfig::default()).unwrap();
        let value = encode_value(&request);

        assert!(value["messages"][0].get("type").is_none());
        assert_eq!(value["messages"][1]["type"], json!("LMS"));
        assert_eq!(value["messages"][1]["subject"], json!("제목"));
    }

    #[test]
    fn option_blocks_are_nested_under_their_keys() {
        let bms = KakaoBmsOption::new(BmsBubble::Text(BmsText::new("본문")))
            .unwrap()
            .with_targeting(KakaoBmsTargeting::I);
        let kakao = Message::builder("01012345678")
            .message_type(MessageType::BmsFree)
            .kakao_options(KakaoOption::bms("KA01PF", bms))
            .custom_field("orderId", "42")
            .build()
            .unwrap();
        let voice = Message::builder("01012345678")
            .text("안내")
            .voice_options(VoiceOption::new(VoiceType::Male))
            .build()
            .unwrap();
        let request = SendRequest::new(vec![kakao, voice], SendRequestConfig::default()).unwrap();
        let value = encode_value(&request);

        assert_eq!(
            value["messages"][0]["kakaoOptions"],
            json!({
                "pfId": "KA01PF",
                "disableSms": false,
                "bms": {"targeting": "I", "chatBubbleType": "TEXT", "content": "본문"}
            })
        );
        assert_eq!(value["messages"][0]["customFields"], json!({"orderId": "42"}));
        assert_eq!(
            value["messages"][1]["voiceOptions"],
            json!({"voiceType": "MALE"})
        );
        assert!(value["messages"][1].get("kakaoOptions").is_none());
    }

    #[test]
    fn encoded_batch_decodes_to_the_same_request() {
        let messages = vec![
            Message::plain("029302266", "01011112222", "hello").unwrap(),
            Message::plain("029302266", "01011112222", "hello").unwrap(),
            Message::builder("01033334444")
                .message_type(MessageType::Ata)
                .kakao_options(KakaoOption::alimtalk("KA01PF", "KA01TP").with_variable("#{name}", "홍길동"))
                .build()
                .unwrap(),
        ];
        let config = SendRequestConfig {
            scheduled_date: Some(parse_instant("2030-01-01T09:00:00.5Z").unwrap()),
            ..SendRequestConfig::default()
        };
        let request = SendRequest::new(messages, config).unwrap();

        let json = encode_send_request(&request).unwrap();
        assert_eq!(decode_send_request(&json).unwrap(), request);
    }

    #[test]
    fn decoding_a_message_with_forbidden_bms_field_fails() {
        let json = r#"{
            "messages": [{
                "to": "01012345678",
                "type": "BMS_FREE",
                "kakaoOptions": {"pfId": "KA01PF", "bms": {"chatBubbleType": "TEXT", "content": "x", "video": {"videoUrl": "https://tv.kakao.com/v/1"}}}
            }],
            "showMessageList": false,
            "allowDuplicates": false
        }"#;
        let err = decode_send_request(json).unwrap_err();
        assert!(err.to_string().contains("video is not allowed for TEXT"));
    }

    #[test]
    fn send_response_with_map_message_list() {
        let json = r#"
        {
          "groupInfo": {
            "groupId": "G4V20240615",
            "status": "SENDING",
            "count": {"total": 2, "sentTotal": 0, "registeredSuccess": 2},
            "scheduledDate": "2024-06-15T05:30:00.000Z"
          },
          "messageList": {
            "M4V1": {"to": "01011112222", "type": "SMS", "statusCode": "2000", "statusMessage": "정상 접수"},
            "M4V2": {"messageId": "M4V2", "to": "01033334444", "type": "LMS", "statusCode": 2000}
          }
        }
        "#;
        let response = decode_send_response(json).unwrap();
        assert_eq!(response.group_info.group_id, "G4V20240615");
        assert_eq!(response.group_info.count.total, 2);
        assert_eq!(response.group_info.count.registered_success, 2);
        assert_eq!(
            response.group_info.scheduled_date,
            Some(parse_instant("2024-06-15T05:30:00Z").unwrap())
        );
        assert_eq!(response.message_list.len(), 2);
        assert_eq!(response.message_list["M4V1"].message_id, "M4V1");
        assert_eq!(
            response.message_list["M4V2"].status_code.as_deref(),
            Some("2000")
        );
        assert!(response.failed_message_list.is_empty());
    }

    #[test]
    fn send_response_with_list_message_list_and_failures() {
        let json = r#"
        {
          "groupInfo": {"groupId": "G1", "count": {"total": 2}},
          "messageList": [
            {"messageId": "M1", "to": "01011112222", "statusCode": "2000", "dateCreated": "2024-06-15T05:30:00.123Z"}
          ],
          "failedMessageList": [
            {"to": "01033334444", "statusCode": "1062", "statusMessage": "발신번호 미등록"}
          ]
        }
        "#;
        let response = decode_send_response(json).unwrap();
        let entry = &response.message_list["M1"];
        assert_eq!(entry.to.as_deref(), Some("01011112222"));
        assert_eq!(
            entry.date_created,
            Some(parse_instant("2024-06-15T05:30:00.123Z").unwrap())
        );
        assert_eq!(
            response.failed_message_list,
            vec![FailedMessage {
                to: Some("01033334444".to_owned()),
                from: None,
                message_type: None,
                status_code: "1062".to_owned(),
                status_message: Some("발신번호 미등록".to_owned()),
            }]
        );
    }

    #[test]
    fn list_entries_need_a_message_id() {
        let json = r#"{"groupInfo": {"groupId": "G1"}, "messageList": [{"to": "01011112222"}]}"#;
        assert!(matches!(
            decode_send_response(json),
            Err(TransportError::MissingMessageId)
        ));
    }

    #[test]
    fn error_body_is_decoded() {
        let body = r#"{"errorCode": "ValidationError", "errorMessage": "발신번호가 등록되지 않았습니다."}"#;
        assert_eq!(
            decode_error_body(body),
            Some(RemoteError {
                error_code: "ValidationError".to_owned(),
                error_message: "발신번호가 등록되지 않았습니다.".to_owned(),
            })
        );
        assert_eq!(decode_error_body("<html>"), None);
    }
}
