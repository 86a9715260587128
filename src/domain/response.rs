use std::collections::BTreeMap;

use crate::domain::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a batch send.
pub struct SendResponse {
    pub group_info: GroupInfo,
    /// Accepted messages keyed by message id. Only filled when the gateway
    /// returns the list (see `SendRequestConfig::show_message_list`).
    pub message_list: BTreeMap<String, MessageStatus>,
    /// Messages the gateway refused to register.
    pub failed_message_list: Vec<FailedMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub group_id: String,
    pub status: Option<String>,
    pub count: GroupCount,
    pub scheduled_date: Option<Instant>,
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupCount {
    pub total: u32,
    pub sent_total: u32,
    pub sent_failed: u32,
    pub sent_success: u32,
    pub sent_pending: u32,
    pub sent_replacement: u32,
    pub refund: u32,
    pub registered_failed: u32,
    pub registered_success: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStatus {
    pub message_id: String,
    pub group_id: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    /// Channel type chosen by the gateway, e.g. `"SMS"`.
    pub message_type: Option<String>,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
    pub country: Option<String>,
    pub date_created: Option<Instant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Per-recipient failure detail.
pub struct FailedMessage {
    pub to: Option<String>,
    pub from: Option<String>,
    pub message_type: Option<String>,
    pub status_code: String,
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One page of the message list query.
pub struct MessageListResponse {
    pub start_key: Option<String>,
    /// Cursor for the next page; `None` on the last page.
    pub next_key: Option<String>,
    pub limit: Option<u32>,
    pub message_list: BTreeMap<String, MessageStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Account balance. Amounts keep the gateway's decimal text.
pub struct Balance {
    pub balance: String,
    pub point: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_id: String,
}
