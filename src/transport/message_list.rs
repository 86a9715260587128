use std::collections::BTreeMap;

use serde::Deserialize;

use super::TransportError;
use super::send::MessageListWire;
use crate::domain::{MessageListQuery, MessageListResponse, format_instant};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListJsonResponse {
    #[serde(default)]
    start_key: Option<String>,
    #[serde(default)]
    next_key: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    message_list: Option<MessageListWire>,
}

/// Query-string pairs for `messages/v4/list`. `messageIds` repeats once per id.
pub fn encode_message_list_query(query: &MessageListQuery) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();

    let mut push = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            params.push((key.to_owned(), value));
        }
    };
    push("to", query.to.as_ref().map(|to| to.as_str().to_owned()));
    push("from", query.from.as_ref().map(|from| from.as_str().to_owned()));
    push("type", query.message_type.map(|kind| kind.as_str().to_owned()));
    push("statusCode", query.status_code.clone());
    push("groupId", query.group_id.clone());
    push("messageId", query.message_id.clone());
    push("startKey", query.start_key.clone());
    push("limit", query.limit.map(|limit| limit.to_string()));
    push("startDate", query.start_date.as_ref().map(format_instant));
    push("endDate", query.end_date.as_ref().map(format_instant));
    push("criteria", query.criteria.clone());
    push("cond", query.cond.clone());
    push("value", query.value.clone());

    for id in &query.message_ids {
        params.push(("messageIds".to_owned(), id.clone()));
    }

    params
}

pub fn decode_message_list_response(json: &str) -> Result<MessageListResponse, TransportError> {
    let parsed: MessageListJsonResponse = serde_json::from_str(json)?;
    let message_list = match parsed.message_list {
        Some(list) => list.into_domain()?,
        None => BTreeMap::new(),
    };
    Ok(MessageListResponse {
        start_key: parsed.start_key,
        next_key: parsed.next_key,
        limit: parsed.limit,
        message_list,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageType, PhoneNumber, parse_instant};

    fn assert_param(params: &[(String, String)], key: &str, value: &str) {
        assert!(
            params.iter().any(|(k, v)| k == key && v == value),
            "missing param {key}={value}; got: {params:?}"
        );
    }

    #[test]
    fn empty_query_has_no_params() {
        assert!(encode_message_list_query(&MessageListQuery::default()).is_empty());
    }

    #[test]
    fn filters_are_encoded() {
        let query = MessageListQuery {
            to: Some(PhoneNumber::new("010-1234-5678").unwrap()),
            message_type: Some(MessageType::Ata),
            status_code: Some("4000".to_owned()),
            message_ids: vec!["M1".to_owned(), "M2".to_owned()],
            limit: Some(20),
            start_date: Some(parse_instant("2024-06-01T00:00:00+09:00").unwrap()),
            end_date: Some(parse_instant("2024-06-15T14:30:00.123456789Z").unwrap()),
            ..MessageListQuery::default()
        };
        let params = encode_message_list_query(&query);

        assert_param(&params, "to", "01012345678");
        assert_param(&params, "type", "ATA");
        assert_param(&params, "statusCode", "4000");
        assert_param(&params, "limit", "20");
        assert_param(&params, "startDate", "2024-05-31T15:00:00Z");
        assert_param(&params, "endDate", "2024-06-15T14:30:00.123456789Z");
        assert_param(&params, "messageIds", "M1");
        assert_param(&params, "messageIds", "M2");
        assert!(!params.iter().any(|(k, _)| k == "from"));
    }

    #[test]
    fn response_page_is_decoded() {
        let json = r#"
        {
          "startKey": null,
          "nextKey": "M4V2",
          "limit": 1,
          "messageList": {
            "M4V1": {"messageId": "M4V1", "groupId": "G1", "to": "01011112222", "type": "ATA",
                     "statusCode": "4000", "statusMessage": "수신완료", "dateCreated": "2024-06-15T05:30:00.000Z"}
          }
        }
        "#;
        let page = decode_message_list_response(json).unwrap();
        assert_eq!(page.next_key.as_deref(), Some("M4V2"));
        assert_eq!(page.limit, Some(1));
        let entry = &page.message_list["M4V1"];
        assert_eq!(entry.group_id.as_deref(), Some("G1"));
        assert_eq!(entry.message_type.as_deref(), Some("ATA"));
    }

    #[test]
    fn last_page_has_no_next_key() {
        let page = decode_message_list_response(r#"{"messageList": {}}"#).unwrap();
        assert!(page.next_key.is_none());
        assert!(page.message_list.is_empty());
    }
}
