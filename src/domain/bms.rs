//! Kakao brand message ("BMS Free") chat bubbles.
//!
//! Each chat bubble layout is its own struct carrying only the fields that
//! layout accepts, collected in the [`BmsBubble`] sum type. On the wire SOLAPI
//! uses one flat object with every field optional ([`BmsOptionFields`]);
//! converting that flat form into a [`KakaoBmsOption`] checks the per-layout
//! field matrix and names the first offending field.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Chat bubble layout (`chatBubbleType`).
pub enum BmsChatBubbleType {
    Text,
    Image,
    Wide,
    WideItemList,
    Commerce,
    CarouselFeed,
    CarouselCommerce,
    PremiumVideo,
}

impl BmsChatBubbleType {
    /// Wire name of the layout.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
            Self::Wide => "WIDE",
            Self::WideItemList => "WIDE_ITEM_LIST",
            Self::Commerce => "COMMERCE",
            Self::CarouselFeed => "CAROUSEL_FEED",
            Self::CarouselCommerce => "CAROUSEL_COMMERCE",
            Self::PremiumVideo => "PREMIUM_VIDEO",
        }
    }

    /// Maximum coupon description length (in characters) for this layout.
    pub fn coupon_description_max(self) -> usize {
        match self {
            Self::Wide | Self::WideItemList => 18,
            _ => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Audience targeting for brand messages.
pub enum KakaoBmsTargeting {
    I,
    M,
    N,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Button action (`linkType`).
pub enum BmsButtonType {
    #[serde(rename = "WL")]
    WebLink,
    #[serde(rename = "AL")]
    AppLink,
    #[serde(rename = "AC")]
    ChannelAdd,
    #[serde(rename = "BK")]
    BotKeyword,
    #[serde(rename = "MD")]
    MessageDelivery,
    #[serde(rename = "BC")]
    Consultation,
    #[serde(rename = "BT")]
    BotTransfer,
    #[serde(rename = "BF")]
    BusinessForm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Per-platform link targets shared by buttons, coupons and carousel parts.
pub struct BmsLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_pc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_android: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_ios: Option<String>,
}

impl BmsLink {
    /// Link that only targets mobile web.
    pub fn mobile(url: impl Into<String>) -> Self {
        Self {
            link_mobile: Some(url.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmsButton {
    pub link_type: BmsButtonType,
    pub name: String,
    #[serde(flatten)]
    pub link: BmsLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_extra: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_out: Option<bool>,
}

impl BmsButton {
    pub fn new(link_type: BmsButtonType, name: impl Into<String>) -> Self {
        Self {
            link_type,
            name: name.into(),
            link: BmsLink::default(),
            chat_extra: None,
            target_out: None,
        }
    }

    /// Web link button opening `link_mobile`.
    pub fn web_link(name: impl Into<String>, link_mobile: impl Into<String>) -> Self {
        Self {
            link: BmsLink::mobile(link_mobile),
            ..Self::new(BmsButtonType::WebLink, name)
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "buttons.name",
            });
        }
        if self.link_type == BmsButtonType::WebLink && self.link.link_mobile.is_none() {
            return Err(ValidationError::MissingField {
                field: "buttons.linkMobile",
                context: "WL button",
            });
        }
        Ok(())
    }
}

static COUPON_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<won>[1-9][0-9]{0,7})원 할인 쿠폰|(?P<percent>[1-9][0-9]{0,2})% 할인 쿠폰|(?P<shipping>배송비 할인 쿠폰)|(?P<free>.{1,7}) 무료 쿠폰|(?P<up>.{1,7}) UP 쿠폰)$",
    )
    .expect("failed to compile coupon title regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Coupon title. Only five title shapes are accepted by Kakao.
pub enum CouponTitle {
    /// `"{amount}원 할인 쿠폰"`, amount in `1..=99_999_999`.
    WonDiscount(u32),
    /// `"{percent}% 할인 쿠폰"`, percent in `1..=100`.
    PercentDiscount(u8),
    /// `"배송비 할인 쿠폰"`.
    ShippingDiscount,
    /// `"{item} 무료 쿠폰"`, item at most 7 characters.
    Free(String),
    /// `"{item} UP 쿠폰"`, item at most 7 characters.
    Up(String),
}

impl CouponTitle {
    pub const WON_MAX: u32 = 99_999_999;
    pub const PERCENT_MAX: u8 = 100;
    pub const ITEM_MAX_CHARS: usize = 7;

    /// Parse a rendered title such as `"10% 할인 쿠폰"`.
    pub fn parse(title: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidCouponTitle {
            title: title.to_owned(),
        };
        let caps = COUPON_TITLE_RE.captures(title).ok_or_else(invalid)?;

        let parsed = if let Some(won) = caps.name("won") {
            Self::WonDiscount(won.as_str().parse().map_err(|_| invalid())?)
        } else if let Some(percent) = caps.name("percent") {
            Self::PercentDiscount(percent.as_str().parse().map_err(|_| invalid())?)
        } else if caps.name("shipping").is_some() {
            Self::ShippingDiscount
        } else if let Some(item) = caps.name("free") {
            Self::Free(item.as_str().to_owned())
        } else if let Some(item) = caps.name("up") {
            Self::Up(item.as_str().to_owned())
        } else {
            return Err(invalid());
        };
        parsed.check().map_err(|_| invalid())?;
        Ok(parsed)
    }

    pub fn won_discount(amount: u32) -> Result<Self, ValidationError> {
        let title = Self::WonDiscount(amount);
        title.check()?;
        Ok(title)
    }

    pub fn percent_discount(percent: u8) -> Result<Self, ValidationError> {
        let title = Self::PercentDiscount(percent);
        title.check()?;
        Ok(title)
    }

    pub fn free(item: impl Into<String>) -> Result<Self, ValidationError> {
        let title = Self::Free(item.into());
        title.check()?;
        Ok(title)
    }

    pub fn up(item: impl Into<String>) -> Result<Self, ValidationError> {
        let title = Self::Up(item.into());
        title.check()?;
        Ok(title)
    }

    /// Check the payload against the ranges Kakao accepts. Variants built
    /// directly skip the constructors, so coupons re-check on validation.
    pub fn check(&self) -> Result<(), ValidationError> {
        match self {
            Self::WonDiscount(amount) => {
                Self::check_range(i64::from(*amount), i64::from(Self::WON_MAX))
            }
            Self::PercentDiscount(percent) => {
                Self::check_range(i64::from(*percent), i64::from(Self::PERCENT_MAX))
            }
            Self::ShippingDiscount => Ok(()),
            Self::Free(item) | Self::Up(item) => Self::check_item(item),
        }
    }

    fn check_range(actual: i64, max: i64) -> Result<(), ValidationError> {
        if !(1..=max).contains(&actual) {
            return Err(ValidationError::OutOfRange {
                field: "coupon.title",
                min: 1,
                max,
                actual,
            });
        }
        Ok(())
    }

    fn check_item(item: &str) -> Result<(), ValidationError> {
        if item.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "coupon.title",
            });
        }
        let count = item.chars().count();
        if count > Self::ITEM_MAX_CHARS || item.contains('\n') {
            return Err(ValidationError::TooLong {
                field: "coupon.title",
                max: Self::ITEM_MAX_CHARS,
                actual: count,
            });
        }
        Ok(())
    }
}

impl fmt::Display for CouponTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WonDiscount(amount) => write!(f, "{amount}원 할인 쿠폰"),
            Self::PercentDiscount(percent) => write!(f, "{percent}% 할인 쿠폰"),
            Self::ShippingDiscount => f.write_str("배송비 할인 쿠폰"),
            Self::Free(item) => write!(f, "{item} 무료 쿠폰"),
            Self::Up(item) => write!(f, "{item} UP 쿠폰"),
        }
    }
}

impl TryFrom<String> for CouponTitle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponTitle> for String {
    fn from(value: CouponTitle) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmsCoupon {
    pub title: CouponTitle,
    /// At most 18 characters in WIDE / WIDE_ITEM_LIST bubbles, 12 elsewhere.
    pub description: String,
    #[serde(flatten)]
    pub link: BmsLink,
}

impl BmsCoupon {
    pub fn new(title: CouponTitle, description: impl Into<String>) -> Self {
        Self {
            title,
            description: description.into(),
            link: BmsLink::default(),
        }
    }

    fn validate(&self, bubble: BmsChatBubbleType) -> Result<(), ValidationError> {
        self.title.check()?;
        if self.description.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "coupon.description",
            });
        }
        let max = bubble.coupon_description_max();
        let actual = self.description.chars().count();
        if actual > max {
            return Err(ValidationError::TooLong {
                field: "coupon.description",
                max,
                actual,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Product card. Prices are plain numbers in KRW.
pub struct BmsCommerce {
    pub title: String,
    pub regular_price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_fixed: Option<u64>,
}

impl BmsCommerce {
    pub fn new(title: impl Into<String>, regular_price: u64) -> Self {
        Self {
            title: title.into(),
            regular_price,
            discount_price: None,
            discount_rate: None,
            discount_fixed: None,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "commerce.title",
            });
        }
        if self.discount_rate.is_some() && self.discount_fixed.is_some() {
            return Err(ValidationError::ConflictingFields {
                first: "commerce.discountRate",
                second: "commerce.discountFixed",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Kakao TV video. URL whitelisting is enforced by the gateway.
pub struct BmsVideo {
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
}

impl BmsVideo {
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            image_id: None,
            image_link: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmsMainWideItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub image_id: String,
    #[serde(flatten)]
    pub link: BmsLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmsSubWideItem {
    pub title: String,
    pub image_id: String,
    #[serde(flatten)]
    pub link: BmsLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Intro card of a commerce carousel.
pub struct BmsCarouselHead {
    pub header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(flatten)]
    pub link: BmsLink,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// "More" card closing a carousel.
pub struct BmsCarouselTail {
    #[serde(flatten)]
    pub link: BmsLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmsCarouselFeedItem {
    pub header: String,
    pub content: String,
    pub image_id: String,
    pub image_link: Option<String>,
    pub buttons: Vec<BmsButton>,
    pub coupon: Option<BmsCoupon>,
}

impl BmsCarouselFeedItem {
    pub fn new(
        header: impl Into<String>,
        content: impl Into<String>,
        image_id: impl Into<String>,
    ) -> Self {
        Self {
            header: header.into(),
            content: content.into(),
            image_id: image_id.into(),
            image_link: None,
            buttons: Vec::new(),
            coupon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmsCarouselCommerceItem {
    pub commerce: BmsCommerce,
    pub image_id: String,
    pub additional_content: Option<String>,
    pub image_link: Option<String>,
    pub buttons: Vec<BmsButton>,
    pub coupon: Option<BmsCoupon>,
}

impl BmsCarouselCommerceItem {
    pub fn new(commerce: BmsCommerce, image_id: impl Into<String>) -> Self {
        Self {
            commerce,
            image_id: image_id.into(),
            additional_content: None,
            image_link: None,
            buttons: Vec::new(),
            coupon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmsText {
    pub content: String,
    pub adult: Option<bool>,
    pub buttons: Vec<BmsButton>,
    pub coupon: Option<BmsCoupon>,
}

impl BmsText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            adult: None,
            buttons: Vec::new(),
            coupon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Body shared by the IMAGE and WIDE layouts.
pub struct BmsImage {
    pub image_id: String,
    pub content: String,
    pub image_link: Option<String>,
    pub adult: Option<bool>,
    pub buttons: Vec<BmsButton>,
    pub coupon: Option<BmsCoupon>,
}

impl BmsImage {
    pub fn new(image_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            content: content.into(),
            image_link: None,
            adult: None,
            buttons: Vec::new(),
            coupon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmsWideItemList {
    pub header: String,
    pub main_wide_item: BmsMainWideItem,
    /// At least [`BmsWideItemList::MIN_SUB_ITEMS`] entries.
    pub sub_wide_item_list: Vec<BmsSubWideItem>,
    pub adult: Option<bool>,
    pub buttons: Vec<BmsButton>,
    pub coupon: Option<BmsCoupon>,
}

impl BmsWideItemList {
    pub const MIN_SUB_ITEMS: usize = 3;

    pub fn new(
        header: impl Into<String>,
        main_wide_item: BmsMainWideItem,
        sub_wide_item_list: Vec<BmsSubWideItem>,
    ) -> Self {
        Self {
            header: header.into(),
            main_wide_item,
            sub_wide_item_list,
            adult: None,
            buttons: Vec::new(),
            coupon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmsCommerceCard {
    pub image_id: String,
    pub commerce: BmsCommerce,
    pub image_link: Option<String>,
    pub additional_content: Option<String>,
    pub adult: Option<bool>,
    pub buttons: Vec<BmsButton>,
    pub coupon: Option<BmsCoupon>,
}

impl BmsCommerceCard {
    pub fn new(image_id: impl Into<String>, commerce: BmsCommerce) -> Self {
        Self {
            image_id: image_id.into(),
            commerce,
            image_link: None,
            additional_content: None,
            adult: None,
            buttons: Vec::new(),
            coupon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmsCarouselFeed {
    pub list: Vec<BmsCarouselFeedItem>,
    pub tail: Option<BmsCarouselTail>,
    pub adult: Option<bool>,
}

impl BmsCarouselFeed {
    pub fn new(list: Vec<BmsCarouselFeedItem>) -> Self {
        Self {
            list,
            tail: None,
            adult: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmsCarouselCommerce {
    pub head: Option<BmsCarouselHead>,
    pub list: Vec<BmsCarouselCommerceItem>,
    pub tail: Option<BmsCarouselTail>,
    pub adult: Option<bool>,
}

impl BmsCarouselCommerce {
    pub fn new(list: Vec<BmsCarouselCommerceItem>) -> Self {
        Self {
            head: None,
            list,
            tail: None,
            adult: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmsPremiumVideo {
    pub video: BmsVideo,
    pub content: String,
    pub header: Option<String>,
    pub adult: Option<bool>,
    pub buttons: Vec<BmsButton>,
    pub coupon: Option<BmsCoupon>,
}

impl BmsPremiumVideo {
    pub fn new(video: BmsVideo, content: impl Into<String>) -> Self {
        Self {
            video,
            content: content.into(),
            header: None,
            adult: None,
            buttons: Vec::new(),
            coupon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A chat bubble, one variant per [`BmsChatBubbleType`].
pub enum BmsBubble {
    Text(BmsText),
    Image(BmsImage),
    Wide(BmsImage),
    WideItemList(BmsWideItemList),
    Commerce(BmsCommerceCard),
    CarouselFeed(BmsCarouselFeed),
    CarouselCommerce(BmsCarouselCommerce),
    PremiumVideo(BmsPremiumVideo),
}

impl BmsBubble {
    pub fn chat_bubble_type(&self) -> BmsChatBubbleType {
        match self {
            Self::Text(_) => BmsChatBubbleType::Text,
            Self::Image(_) => BmsChatBubbleType::Image,
            Self::Wide(_) => BmsChatBubbleType::Wide,
            Self::WideItemList(_) => BmsChatBubbleType::WideItemList,
            Self::Commerce(_) => BmsChatBubbleType::Commerce,
            Self::CarouselFeed(_) => BmsChatBubbleType::CarouselFeed,
            Self::CarouselCommerce(_) => BmsChatBubbleType::CarouselCommerce,
            Self::PremiumVideo(_) => BmsChatBubbleType::PremiumVideo,
        }
    }

    /// Check the rules the type system cannot express (non-empty strings,
    /// list sizes, coupon and button rules).
    pub fn validate(&self) -> Result<(), ValidationError> {
        let kind = self.chat_bubble_type();
        let ctx = kind.as_str();
        match self {
            Self::Text(text) => {
                non_empty("content", &text.content)?;
                check_extras(kind, &text.buttons, text.coupon.as_ref())
            }
            Self::Image(image) | Self::Wide(image) => {
                non_empty("imageId", &image.image_id)?;
                non_empty("content", &image.content)?;
                check_extras(kind, &image.buttons, image.coupon.as_ref())
            }
            Self::WideItemList(list) => {
                non_empty("header", &list.header)?;
                non_empty("mainWideItem.imageId", &list.main_wide_item.image_id)?;
                if list.sub_wide_item_list.len() < BmsWideItemList::MIN_SUB_ITEMS {
                    return Err(ValidationError::TooFewItems {
                        field: "subWideItemList",
                        min: BmsWideItemList::MIN_SUB_ITEMS,
                        actual: list.sub_wide_item_list.len(),
                    });
                }
                for item in &list.sub_wide_item_list {
                    non_empty("subWideItemList.title", &item.title)?;
                    non_empty("subWideItemList.imageId", &item.image_id)?;
                }
                check_extras(kind, &list.buttons, list.coupon.as_ref())
            }
            Self::Commerce(card) => {
                non_empty("imageId", &card.image_id)?;
                card.commerce.validate()?;
                check_extras(kind, &card.buttons, card.coupon.as_ref())
            }
            Self::CarouselFeed(feed) => {
                non_empty_list(ctx, feed.list.len())?;
                for item in &feed.list {
                    non_empty("carousel.list.header", &item.header)?;
                    non_empty("carousel.list.content", &item.content)?;
                    non_empty("carousel.list.imageId", &item.image_id)?;
                    check_extras(kind, &item.buttons, item.coupon.as_ref())?;
                }
                Ok(())
            }
            Self::CarouselCommerce(carousel) => {
                non_empty_list(ctx, carousel.list.len())?;
                if let Some(head) = &carousel.head {
                    non_empty("carousel.head.header", &head.header)?;
                }
                for item in &carousel.list {
                    item.commerce.validate()?;
                    non_empty("carousel.list.imageId", &item.image_id)?;
                    check_extras(kind, &item.buttons, item.coupon.as_ref())?;
                }
                Ok(())
            }
            Self::PremiumVideo(video) => {
                non_empty("video.videoUrl", &video.video.video_url)?;
                non_empty("content", &video.content)?;
                check_extras(kind, &video.buttons, video.coupon.as_ref())
            }
        }
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

fn non_empty_list(context: &'static str, len: usize) -> Result<(), ValidationError> {
    if len == 0 {
        return Err(ValidationError::MissingField {
            field: "carousel.list",
            context,
        });
    }
    Ok(())
}

fn check_extras(
    kind: BmsChatBubbleType,
    buttons: &[BmsButton],
    coupon: Option<&BmsCoupon>,
) -> Result<(), ValidationError> {
    for button in buttons {
        button.validate()?;
    }
    if let Some(coupon) = coupon {
        coupon.validate(kind)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BmsOptionFields", into = "BmsOptionFields")]
/// Brand message block of a Kakao option (`kakaoOptions.bms`).
///
/// Either a full chat bubble, or targeting alone (used together with a
/// pre-registered template).
pub struct KakaoBmsOption {
    targeting: Option<KakaoBmsTargeting>,
    bubble: Option<BmsBubble>,
}

impl KakaoBmsOption {
    /// Create a validated free-form brand message.
    pub fn new(bubble: BmsBubble) -> Result<Self, ValidationError> {
        bubble.validate()?;
        Ok(Self {
            targeting: None,
            bubble: Some(bubble),
        })
    }

    /// Targeting only, without a chat bubble.
    pub fn targeting_only(targeting: KakaoBmsTargeting) -> Self {
        Self {
            targeting: Some(targeting),
            bubble: None,
        }
    }

    pub fn with_targeting(mut self, targeting: KakaoBmsTargeting) -> Self {
        self.targeting = Some(targeting);
        self
    }

    pub fn targeting(&self) -> Option<KakaoBmsTargeting> {
        self.targeting
    }

    pub fn bubble(&self) -> Option<&BmsBubble> {
        self.bubble.as_ref()
    }

    pub fn chat_bubble_type(&self) -> Option<BmsChatBubbleType> {
        self.bubble.as_ref().map(BmsBubble::chat_bubble_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Flat wire form of a carousel entry (feed and commerce fields together).
pub struct BmsCarouselItemFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commerce: Option<BmsCommerce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<BmsButton>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<BmsCoupon>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmsCarouselFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<BmsCarouselHead>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<BmsCarouselItemFields>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail: Option<BmsCarouselTail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Flat superset of every chat bubble field, as sent to SOLAPI.
///
/// Convert into [`KakaoBmsOption`] with `TryFrom` to validate it.
pub struct BmsOptionFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targeting: Option<KakaoBmsTargeting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_bubble_type: Option<BmsChatBubbleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adult: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carousel: Option<BmsCarouselFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_wide_item: Option<BmsMainWideItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_wide_item_list: Option<Vec<BmsSubWideItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<BmsButton>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<BmsCoupon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commerce: Option<BmsCommerce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<BmsVideo>,
}

fn forbid(context: &'static str, fields: &[(&'static str, bool)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, present)| *present) {
        Some((field, _)) => Err(ValidationError::ForbiddenField {
            field: *field,
            context,
        }),
        None => Ok(()),
    }
}

fn require<T>(
    context: &'static str,
    field: &'static str,
    value: Option<T>,
) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { field, context })
}

fn vec_or_empty<T>(list: Option<Vec<T>>) -> Vec<T> {
    list.unwrap_or_default()
}

fn into_option_vec<T>(list: Vec<T>) -> Option<Vec<T>> {
    if list.is_empty() { None } else { Some(list) }
}

impl TryFrom<BmsOptionFields> for KakaoBmsOption {
    type Error = ValidationError;

    fn try_from(fields: BmsOptionFields) -> Result<Self, Self::Error> {
        let BmsOptionFields {
            targeting,
            chat_bubble_type,
            adult,
            header,
            image_id,
            image_link,
            additional_content,
            content,
            carousel,
            main_wide_item,
            sub_wide_item_list,
            buttons,
            coupon,
            commerce,
            video,
        } = fields;

        let Some(kind) = chat_bubble_type else {
            let has_bubble_fields = adult.is_some()
                || header.is_some()
                || image_id.is_some()
                || image_link.is_some()
                || additional_content.is_some()
                || content.is_some()
                || carousel.is_some()
                || main_wide_item.is_some()
                || sub_wide_item_list.is_some()
                || buttons.is_some()
                || coupon.is_some()
                || commerce.is_some()
                || video.is_some();
            if has_bubble_fields {
                return Err(ValidationError::MissingField {
                    field: "chatBubbleType",
                    context: "BMS option with chat bubble fields",
                });
            }
            return Ok(Self {
                targeting,
                bubble: None,
            });
        };

        let ctx = kind.as_str();
        let buttons = vec_or_empty(buttons);
        let bubble = match kind {
            BmsChatBubbleType::Text => {
                forbid(
                    ctx,
                    &[
                        ("header", header.is_some()),
                        ("imageId", image_id.is_some()),
                        ("imageLink", image_link.is_some()),
                        ("additionalContent", additional_content.is_some()),
                        ("carousel", carousel.is_some()),
                        ("mainWideItem", main_wide_item.is_some()),
                        ("subWideItemList", sub_wide_item_list.is_some()),
                        ("commerce", commerce.is_some()),
                        ("video", video.is_some()),
                    ],
                )?;
                BmsBubble::Text(BmsText {
                    content: require(ctx, "content", content)?,
                    adult,
                    buttons,
                    coupon,
                })
            }
            BmsChatBubbleType::Image | BmsChatBubbleType::Wide => {
                forbid(
                    ctx,
                    &[
                        ("header", header.is_some()),
                        ("additionalContent", additional_content.is_some()),
                        ("carousel", carousel.is_some()),
                        ("mainWideItem", main_wide_item.is_some()),
                        ("subWideItemList", sub_wide_item_list.is_some()),
                        ("commerce", commerce.is_some()),
                        ("video", video.is_some()),
                    ],
                )?;
                let image = BmsImage {
                    image_id: require(ctx, "imageId", image_id)?,
                    content: require(ctx, "content", content)?,
                    image_link,
                    adult,
                    buttons,
                    coupon,
                };
                if kind == BmsChatBubbleType::Image {
                    BmsBubble::Image(image)
                } else {
                    BmsBubble::Wide(image)
                }
            }
            BmsChatBubbleType::WideItemList => {
                forbid(
                    ctx,
                    &[
                        ("content", content.is_some()),
                        ("imageId", image_id.is_some()),
                        ("imageLink", image_link.is_some()),
                        ("additionalContent", additional_content.is_some()),
                        ("carousel", carousel.is_some()),
                        ("commerce", commerce.is_some()),
                        ("video", video.is_some()),
                    ],
                )?;
                BmsBubble::WideItemList(BmsWideItemList {
                    header: require(ctx, "header", header)?,
                    main_wide_item: require(ctx, "mainWideItem", main_wide_item)?,
                    sub_wide_item_list: require(ctx, "subWideItemList", sub_wide_item_list)?,
                    adult,
                    buttons,
                    coupon,
                })
            }
            BmsChatBubbleType::Commerce => {
                forbid(
                    ctx,
                    &[
                        ("header", header.is_some()),
                        ("content", content.is_some()),
                        ("carousel", carousel.is_some()),
                        ("mainWideItem", main_wide_item.is_some()),
                        ("subWideItemList", sub_wide_item_list.is_some()),
                        ("video", video.is_some()),
                    ],
                )?;
                BmsBubble::Commerce(BmsCommerceCard {
                    image_id: require(ctx, "imageId", image_id)?,
                    commerce: require(ctx, "commerce", commerce)?,
                    image_link,
                    additional_content,
                    adult,
                    buttons,
                    coupon,
                })
            }
            BmsChatBubbleType::CarouselFeed | BmsChatBubbleType::CarouselCommerce => {
                forbid(
                    ctx,
                    &[
                        ("header", header.is_some()),
                        ("imageId", image_id.is_some()),
                        ("imageLink", image_link.is_some()),
                        ("additionalContent", additional_content.is_some()),
                        ("content", content.is_some()),
                        ("mainWideItem", main_wide_item.is_some()),
                        ("subWideItemList", sub_wide_item_list.is_some()),
                        ("buttons", !buttons.is_empty()),
                        ("coupon", coupon.is_some()),
                        ("commerce", commerce.is_some()),
                        ("video", video.is_some()),
                    ],
                )?;
                let carousel = require(ctx, "carousel", carousel)?;
                let list = require(ctx, "carousel.list", carousel.list)?;
                if kind == BmsChatBubbleType::CarouselFeed {
                    forbid(ctx, &[("carousel.head", carousel.head.is_some())])?;
                    BmsBubble::CarouselFeed(BmsCarouselFeed {
                        list: list
                            .into_iter()
                            .map(|item| feed_item_from_fields(ctx, item))
                            .collect::<Result<_, _>>()?,
                        tail: carousel.tail,
                        adult,
                    })
                } else {
                    BmsBubble::CarouselCommerce(BmsCarouselCommerce {
                        head: carousel.head,
                        list: list
                            .into_iter()
                            .map(|item| commerce_item_from_fields(ctx, item))
                            .collect::<Result<_, _>>()?,
                        tail: carousel.tail,
                        adult,
                    })
                }
            }
            BmsChatBubbleType::PremiumVideo => {
                forbid(
                    ctx,
                    &[
                        ("additionalContent", additional_content.is_some()),
                        ("imageId", image_id.is_some()),
                        ("imageLink", image_link.is_some()),
                        ("carousel", carousel.is_some()),
                        ("mainWideItem", main_wide_item.is_some()),
                        ("subWideItemList", sub_wide_item_list.is_some()),
                        ("commerce", commerce.is_some()),
                    ],
                )?;
                BmsBubble::PremiumVideo(BmsPremiumVideo {
                    video: require(ctx, "video", video)?,
                    content: require(ctx, "content", content)?,
                    header,
                    adult,
                    buttons,
                    coupon,
                })
            }
        };

        bubble.validate()?;
        Ok(Self {
            targeting,
            bubble: Some(bubble),
        })
    }
}

fn feed_item_from_fields(
    ctx: &'static str,
    item: BmsCarouselItemFields,
) -> Result<BmsCarouselFeedItem, ValidationError> {
    forbid(
        ctx,
        &[
            ("carousel.list.commerce", item.commerce.is_some()),
            (
                "carousel.list.additionalContent",
                item.additional_content.is_some(),
            ),
        ],
    )?;
    Ok(BmsCarouselFeedItem {
        header: require(ctx, "carousel.list.header", item.header)?,
        content: require(ctx, "carousel.list.content", item.content)?,
        image_id: require(ctx, "carousel.list.imageId", item.image_id)?,
        image_link: item.image_link,
        buttons: vec_or_empty(item.buttons),
        coupon: item.coupon,
    })
}

fn commerce_item_from_fields(
    ctx: &'static str,
    item: BmsCarouselItemFields,
) -> Result<BmsCarouselCommerceItem, ValidationError> {
    forbid(
        ctx,
        &[
            ("carousel.list.header", item.header.is_some()),
            ("carousel.list.content", item.content.is_some()),
        ],
    )?;
    Ok(BmsCarouselCommerceItem {
        commerce: require(ctx, "carousel.list.commerce", item.commerce)?,
        image_id: require(ctx, "carousel.list.imageId", item.image_id)?,
        additional_content: item.additional_content,
        image_link: item.image_link,
        buttons: vec_or_empty(item.buttons),
        coupon: item.coupon,
    })
}

impl From<BmsCarouselFeedItem> for BmsCarouselItemFields {
    fn from(item: BmsCarouselFeedItem) -> Self {
        Self {
            header: Some(item.header),
            content: Some(item.content),
            image_id: Some(item.image_id),
            image_link: item.image_link,
            buttons: into_option_vec(item.buttons),
            coupon: item.coupon,
            ..Self::default()
        }
    }
}

impl From<BmsCarouselCommerceItem> for BmsCarouselItemFields {
    fn from(item: BmsCarouselCommerceItem) -> Self {
        Self {
            commerce: Some(item.commerce),
            additional_content: item.additional_content,
            image_id: Some(item.image_id),
            image_link: item.image_link,
            buttons: into_option_vec(item.buttons),
            coupon: item.coupon,
            ..Self::default()
        }
    }
}

impl From<KakaoBmsOption> for BmsOptionFields {
    fn from(option: KakaoBmsOption) -> Self {
        let mut fields = Self {
            targeting: option.targeting,
            ..Self::default()
        };
        let Some(bubble) = option.bubble else {
            return fields;
        };
        fields.chat_bubble_type = Some(bubble.chat_bubble_type());

        match bubble {
            BmsBubble::Text(text) => {
                fields.content = Some(text.content);
                fields.adult = text.adult;
                fields.buttons = into_option_vec(text.buttons);
                fields.coupon = text.coupon;
            }
            BmsBubble::Image(image) | BmsBubble::Wide(image) => {
                fields.image_id = Some(image.image_id);
                fields.content = Some(image.content);
                fields.image_link = image.image_link;
                fields.adult = image.adult;
                fields.buttons = into_option_vec(image.buttons);
                fields.coupon = image.coupon;
            }
            BmsBubble::WideItemList(list) => {
                fields.header = Some(list.header);
                fields.main_wide_item = Some(list.main_wide_item);
                fields.sub_wide_item_list = Some(list.sub_wide_item_list);
                fields.adult = list.adult;
                fields.buttons = into_option_vec(list.buttons);
                fields.coupon = list.coupon;
            }
            BmsBubble::Commerce(card) => {
                fields.image_id = Some(card.image_id);
                fields.commerce = Some(card.commerce);
                fields.image_link = card.image_link;
                fields.additional_content = card.additional_content;
                fields.adult = card.adult;
                fields.buttons = into_option_vec(card.buttons);
                fields.coupon = card.coupon;
            }
            BmsBubble::CarouselFeed(feed) => {
                fields.carousel = Some(BmsCarouselFields {
                    head: None,
                    list: Some(feed.list.into_iter().map(Into::into).collect()),
                    tail: feed.tail,
                });
                fields.adult = feed.adult;
            }
            BmsBubble::CarouselCommerce(carousel) => {
                fields.carousel = Some(BmsCarouselFields {
                    head: carousel.head,
                    list: Some(carousel.list.into_iter().map(Into::into).collect()),
                    tail: carousel.tail,
                });
                fields.adult = carousel.adult;
            }
            BmsBubble::PremiumVideo(video) => {
                fields.video = Some(video.video);
                fields.content = Some(video.content);
                fields.header = video.header;
                fields.adult = video.adult;
                fields.buttons = into_option_vec(video.buttons);
                fields.coupon = video.coupon;
            }
        }
        fields
    }
}
