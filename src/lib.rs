//! Typed Rust client for the SOLAPI messaging gateway.
//!
//! The crate is split into a domain layer of strong types (messages, Kakao /
//! brand message / voice options, batch requests, time conversion), a
//! transport layer for the JSON wire format, and a small client layer that
//! signs requests and maps responses.
//!
//! ```rust,no_run
//! use solapi::{Authenticator, Message, SendRequest, SolapiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), solapi::SolapiError> {
//!     let client = SolapiClient::new(Authenticator::new("API_KEY", "API_SECRET"));
//!     let message = Message::plain("029302266", "010-1234-5678", "hello")?;
//!     let response = client.send(&SendRequest::single(message)).await?;
//!     println!("group {}", response.group_info.group_id);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{Authenticator, CredentialError, SolapiClient, SolapiClientBuilder, SolapiError};
pub use domain::{
    Balance, BmsBubble, BmsButton, BmsButtonType, BmsChatBubbleType, BmsCommerce, BmsCoupon,
    BmsOptionFields, ChannelOptions, CouponTitle, FailedMessage, FileUpload, GroupCount, GroupInfo,
    Instant, KakaoBmsOption, KakaoBmsTargeting, KakaoButton, KakaoButtonType, KakaoOption,
    KakaoTemplateDateCondition, KakaoTemplateDateQuery, Message, MessageBuilder, MessageListQuery,
    MessageListResponse, MessageStatus, MessageType, ParsedPhoneNumber, PhoneNumber, SendRequest,
    SendRequestConfig, SendResponse, StorageType, UploadedFile, ValidationError, VoiceOption,
    VoiceType, format_instant, parse_instant, parse_zone, to_instant, to_instant_in_local_zone,
};
