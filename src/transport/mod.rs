//! Transport layer: wire-format details (JSON bodies, query strings).

mod balance;
mod message_list;
mod send;
mod storage;

pub use balance::decode_balance_response;
pub use message_list::{decode_message_list_response, encode_message_list_query};
pub use send::{decode_error_body, decode_send_response, encode_send_request};
pub use storage::{decode_upload_response, encode_upload_body};

use crate::domain::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid field value: {0}")]
    Validation(#[from] ValidationError),

    #[error("message list entry without messageId")]
    MissingMessageId,
}
