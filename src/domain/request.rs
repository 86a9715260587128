use chrono::{NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::message::Message;
use crate::domain::time::{Instant, to_instant, to_instant_in_local_zone};
use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageType, PhoneNumber, StorageType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Batch-level settings for [`SendRequest`].
///
/// Defaults: no app id, duplicates rejected by the gateway, no message list in
/// the response, immediate delivery.
pub struct SendRequestConfig {
    pub app_id: Option<String>,
    /// Let the gateway accept repeated recipients within one batch.
    pub allow_duplicates: bool,
    /// Ask the gateway to include the per-message list in the response.
    pub show_message_list: bool,
    /// Deliver at this instant instead of immediately.
    ///
    /// Not range-checked locally; past instants mean "send now".
    pub scheduled_date: Option<Instant>,
}

impl SendRequestConfig {
    pub fn scheduled_at(mut self, instant: Instant) -> Self {
        self.scheduled_date = Some(instant);
        self
    }

    /// Schedule at a wall-clock time in `zone`.
    pub fn scheduled_at_local<Tz: TimeZone>(
        self,
        local: NaiveDateTime,
        zone: &Tz,
    ) -> Result<Self, ValidationError> {
        Ok(self.scheduled_at(to_instant(local, zone)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One or more messages sent together as a message group.
///
/// The message list is kept as given: no reordering, deduplication or
/// rewriting happens locally.
pub struct SendRequest {
    messages: Vec<Message>,
    config: SendRequestConfig,
}

impl SendRequest {
    pub fn new(messages: Vec<Message>, config: SendRequestConfig) -> Result<Self, ValidationError> {
        if messages.is_empty() {
            return Err(ValidationError::Empty { field: "messages" });
        }
        Ok(Self { messages, config })
    }

    pub fn single(message: Message) -> Self {
        Self {
            messages: vec![message],
            config: SendRequestConfig::default(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn config(&self) -> &SendRequestConfig {
        &self.config
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Filters for the message list query. Every field is optional.
pub struct MessageListQuery {
    pub to: Option<PhoneNumber>,
    pub from: Option<PhoneNumber>,
    pub message_type: Option<MessageType>,
    pub status_code: Option<String>,
    pub group_id: Option<String>,
    pub message_id: Option<String>,
    pub message_ids: Vec<String>,
    /// Pagination cursor, the `nextKey` of a previous page.
    pub start_key: Option<String>,
    pub limit: Option<u32>,
    pub start_date: Option<Instant>,
    pub end_date: Option<Instant>,
    pub criteria: Option<String>,
    pub cond: Option<String>,
    pub value: Option<String>,
}

impl MessageListQuery {
    /// Query that continues after the page returning `next_key`.
    pub fn next_page(&self, next_key: impl Into<String>) -> Self {
        Self {
            start_key: Some(next_key.into()),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ValidationError::InvertedRange {
                    start: "startDate",
                    end: "endDate",
                });
            }
        }
        if self.limit == Some(0) {
            return Err(ValidationError::OutOfRange {
                field: "limit",
                min: 1,
                max: i64::from(u32::MAX),
                actual: 0,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Comparison applied by a [`KakaoTemplateDateQuery`]. The wire names keep
/// the gateway's spelling.
pub enum KakaoTemplateDateCondition {
    #[serde(rename = "EQUALS")]
    Equals,
    #[serde(rename = "GREATER_THEN_OR_EQUAL")]
    GreaterThanOrEqual,
    #[serde(rename = "GREATER_THEN")]
    GreaterThan,
    #[serde(rename = "LESS_THEN_OR_EQUAL")]
    LessThanOrEqual,
    #[serde(rename = "LESS_THEN")]
    LessThan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Date filter for Kakao template lookups (`dateCreated`, `dateUpdated`).
pub struct KakaoTemplateDateQuery {
    pub date: Instant,
    pub condition: KakaoTemplateDateCondition,
}

impl KakaoTemplateDateQuery {
    pub fn new(date: Instant, condition: KakaoTemplateDateCondition) -> Self {
        Self { date, condition }
    }

    /// Filter on a wall-clock time in `zone`.
    pub fn from_local<Tz: TimeZone>(
        local: NaiveDateTime,
        condition: KakaoTemplateDateCondition,
        zone: &Tz,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(to_instant(local, zone)?, condition))
    }

    /// Same as [`KakaoTemplateDateQuery::from_local`] in the system zone.
    pub fn from_local_in_local_zone(
        local: NaiveDateTime,
        condition: KakaoTemplateDateCondition,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(to_instant_in_local_zone(local)?, condition))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// File to store before referencing it by id from a message.
pub struct FileUpload {
    bytes: Vec<u8>,
    storage_type: StorageType,
    name: Option<String>,
}

impl FileUpload {
    pub fn new(bytes: Vec<u8>, storage_type: StorageType) -> Result<Self, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::Empty { field: "file" });
        }
        Ok(Self {
            bytes,
            storage_type,
            name: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::time::{parse_instant, parse_zone};

    fn message(to: &str) -> Message {
        Message::plain("029302266", to, "hello").unwrap()
    }

    #[test]
    fn config_defaults_match_gateway_defaults() {
        let config = SendRequestConfig::default();
        assert!(!config.allow_duplicates);
        assert!(!config.show_message_list);
        assert!(config.app_id.is_none());
        assert!(config.scheduled_date.is_none());
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_eq!(
            SendRequest::new(Vec::new(), SendRequestConfig::default()).unwrap_err(),
            ValidationError::Empty { field: "messages" }
        );
    }

    #[test]
    fn batch_keeps_duplicates_and_order() {
        let messages = vec![
            message("01011112222"),
            message("01011112222"),
            message("01011112222"),
            message("01033334444"),
        ];
        for allow_duplicates in [true, false] {
            let config = SendRequestConfig {
                allow_duplicates,
                ..SendRequestConfig::default()
            };
            let request = SendRequest::new(messages.clone(), config).unwrap();
            assert_eq!(request.messages(), messages.as_slice());
        }
    }

    #[test]
    fn local_schedule_is_converted_with_the_given_zone() {
        let local = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let config = SendRequestConfig::default()
            .scheduled_at_local(local, &parse_zone("Asia/Seoul").unwrap())
            .unwrap();
        assert_eq!(
            config.scheduled_date,
            Some(parse_instant("2024-06-15T05:30:00Z").unwrap())
        );
    }

    #[test]
    fn past_schedule_is_not_checked_locally() {
        let past = parse_instant("2001-01-01T00:00:00Z").unwrap();
        let config = SendRequestConfig::default().scheduled_at(past);
        assert!(SendRequest::new(vec![message("01012345678")], config).is_ok());
    }

    #[test]
    fn list_query_checks_date_order_and_limit() {
        let query = MessageListQuery {
            start_date: Some(parse_instant("2024-06-02T00:00:00Z").unwrap()),
            end_date: Some(parse_instant("2024-06-01T00:00:00Z").unwrap()),
            ..MessageListQuery::default()
        };
        assert!(matches!(
            query.validate(),
            Err(ValidationError::InvertedRange { .. })
        ));

        let query = MessageListQuery {
            limit: Some(0),
            ..MessageListQuery::default()
        };
        assert!(query.validate().is_err());

        let next = MessageListQuery::default().next_page("cursor");
        assert_eq!(next.start_key.as_deref(), Some("cursor"));
        assert!(next.validate().is_ok());
    }

    #[test]
    fn empty_upload_is_rejected() {
        assert!(FileUpload::new(Vec::new(), StorageType::Mms).is_err());
        let upload = FileUpload::new(vec![0xff, 0xd8], StorageType::Mms)
            .unwrap()
            .with_name("photo.jpg");
        assert_eq!(upload.name(), Some("photo.jpg"));
    }

    #[test]
    fn template_date_query_from_local_time() {
        let local = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();

        let query =
            KakaoTemplateDateQuery::from_local(local, KakaoTemplateDateCondition::Equals, &chrono::Utc)
                .unwrap();
        assert_eq!(query.date, parse_instant("2024-06-15T14:30:00Z").unwrap());
        assert_eq!(query.condition, KakaoTemplateDateCondition::Equals);

        let seoul = parse_zone("Asia/Seoul").unwrap();
        let query = KakaoTemplateDateQuery::from_local(
            local,
            KakaoTemplateDateCondition::GreaterThan,
            &seoul,
        )
        .unwrap();
        assert_eq!(query.date, parse_instant("2024-06-15T05:30:00Z").unwrap());
    }

    #[test]
    fn template_date_query_keeps_a_given_instant() {
        let instant = parse_instant("2024-06-15T14:30:00Z").unwrap();
        let query = KakaoTemplateDateQuery::new(instant, KakaoTemplateDateCondition::LessThan);
        assert_eq!(query.date, instant);
        assert_eq!(query.condition, KakaoTemplateDateCondition::LessThan);
    }

    #[test]
    fn template_date_query_defaults_to_the_system_zone() {
        let local = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let query = KakaoTemplateDateQuery::from_local_in_local_zone(
            local,
            KakaoTemplateDateCondition::Equals,
        )
        .unwrap();
        assert_eq!(query.date, to_instant(local, &chrono::Local).unwrap());
    }

    #[test]
    fn template_date_conditions_use_gateway_names() {
        let names: Vec<String> = [
            KakaoTemplateDateCondition::Equals,
            KakaoTemplateDateCondition::GreaterThanOrEqual,
            KakaoTemplateDateCondition::GreaterThan,
            KakaoTemplateDateCondition::LessThanOrEqual,
            KakaoTemplateDateCondition::LessThan,
        ]
        .iter()
        .map(|condition| serde_json::to_string(condition).unwrap())
        .collect();
        assert_eq!(
            names,
            [
                "\"EQUALS\"",
                "\"GREATER_THEN_OR_EQUAL\"",
                "\"GREATER_THEN\"",
                "\"LESS_THEN_OR_EQUAL\"",
                "\"LESS_THEN\"",
            ]
        );
    }
}
