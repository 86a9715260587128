//! Domain layer: strong types with validation and invariants (no I/O).

mod bms;
mod kakao;
mod message;
mod request;
mod response;
mod time;
mod validation;
mod value;
mod voice;

pub use bms::{
    BmsBubble, BmsButton, BmsButtonType, BmsCarouselCommerce, BmsCarouselCommerceItem,
    BmsCarouselFeed, BmsCarouselFeedItem, BmsCarouselFields, BmsCarouselHead,
    BmsCarouselItemFields, BmsCarouselTail, BmsChatBubbleType, BmsCommerce, BmsCommerceCard,
    BmsCoupon, BmsImage, BmsLink, BmsMainWideItem, BmsOptionFields, BmsPremiumVideo,
    BmsSubWideItem, BmsText, BmsVideo, BmsWideItemList, CouponTitle, KakaoBmsOption,
    KakaoBmsTargeting,
};
pub use kakao::{KakaoButton, KakaoButtonType, KakaoOption};
pub use message::{ChannelOptions, DEFAULT_COUNTRY, Message, MessageBuilder, SMS_MAX_BYTES};
pub use request::{
    FileUpload, KakaoTemplateDateCondition, KakaoTemplateDateQuery, MessageListQuery, SendRequest,
    SendRequestConfig,
};
pub use response::{
    Balance, FailedMessage, GroupCount, GroupInfo, MessageListResponse, MessageStatus,
    SendResponse, UploadedFile,
};
pub use time::{
    Instant, format_instant, parse_instant, parse_zone, to_instant, to_instant_in_local_zone,
};
pub use validation::ValidationError;
pub use value::{MessageType, ParsedPhoneNumber, PhoneNumber, StorageType};
pub use voice::{VoiceOption, VoiceType};

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_list_option() -> KakaoBmsOption {
        let link = BmsLink::mobile("https://example.com");
        let sub_items = (1..=3)
            .map(|idx| BmsSubWideItem {
                title: format!("상품 {idx}"),
                image_id: format!("IMG{idx}"),
                link: link.clone(),
            })
            .collect();
        let list = BmsWideItemList::new(
            "오늘의 추천",
            BmsMainWideItem {
                title: None,
                image_id: "IMG0".to_owned(),
                link,
            },
            sub_items,
        );
        KakaoBmsOption::new(BmsBubble::WideItemList(list)).unwrap()
    }

    #[test]
    fn bms_free_message_with_wide_item_list() {
        let message = Message::builder("010-1234-5678")
            .from("02-930-2266")
            .message_type(MessageType::BmsFree)
            .kakao_options(KakaoOption::bms("KA01PF", wide_list_option()))
            .build()
            .unwrap();

        let bubble = message
            .kakao_options()
            .and_then(|kakao| kakao.bms.as_ref())
            .and_then(KakaoBmsOption::chat_bubble_type);
        assert_eq!(bubble, Some(BmsChatBubbleType::WideItemList));
    }

    #[test]
    fn flat_fields_from_a_gateway_payload_build_a_message() {
        let json = r#"{
            "chatBubbleType": "IMAGE",
            "imageId": "IMG123",
            "content": "이미지 메시지",
            "coupon": {"title": "배송비 할인 쿠폰", "description": "오늘만", "linkMobile": "https://example.com"}
        }"#;
        let fields: BmsOptionFields = serde_json::from_str(json).unwrap();
        let option = KakaoBmsOption::try_from(fields).unwrap();

        let message = Message::builder("01012345678")
            .message_type(MessageType::BmsFree)
            .kakao_options(KakaoOption::bms("KA01PF", option))
            .build()
            .unwrap();
        assert_eq!(message.resolved_type(), Some(MessageType::BmsFree));
    }

    #[test]
    fn batch_of_mixed_channels() {
        let messages = vec![
            Message::plain("029302266", "01011112222", "문자").unwrap(),
            Message::builder("01011112222")
                .message_type(MessageType::Voice)
                .text("음성 안내입니다")
                .voice_options(VoiceOption::new(VoiceType::Male))
                .build()
                .unwrap(),
            Message::builder("01011112222")
                .message_type(MessageType::Ata)
                .kakao_options(KakaoOption::alimtalk("KA01PF", "KA01TP"))
                .build()
                .unwrap(),
        ];
        let request = SendRequest::new(messages, SendRequestConfig::default()).unwrap();
        let types: Vec<_> = request
            .messages()
            .iter()
            .map(Message::resolved_type)
            .collect();
        assert_eq!(
            types,
            vec![
                Some(MessageType::Sms),
                Some(MessageType::Voice),
                Some(MessageType::Ata)
            ]
        );
    }
}
