use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    InvalidPhoneNumber {
        input: String,
    },
    InvalidCountryCode {
        input: String,
    },
    MissingField {
        field: &'static str,
        context: &'static str,
    },
    ForbiddenField {
        field: &'static str,
        context: &'static str,
    },
    TooFewItems {
        field: &'static str,
        min: usize,
        actual: usize,
    },
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },
    InvalidCouponTitle {
        title: String,
    },
    ConflictingFields {
        first: &'static str,
        second: &'static str,
    },
    InvalidInstant {
        input: String,
    },
    NonexistentLocalTime {
        local: String,
    },
    UnknownTimeZone {
        id: String,
    },
    InvertedRange {
        start: &'static str,
        end: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidCountryCode { input } => {
                write!(f, "invalid country calling code: {input}")
            }
            Self::MissingField { field, context } => {
                write!(f, "{field} is required for {context}")
            }
            Self::ForbiddenField { field, context } => {
                write!(f, "{field} is not allowed for {context}")
            }
            Self::TooFewItems { field, min, actual } => {
                write!(f, "{field} needs at least {min} items, got {actual}")
            }
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} out of range: {actual} (expected {min}..={max})"
            ),
            Self::InvalidCouponTitle { title } => write!(f, "invalid coupon title: {title}"),
            Self::ConflictingFields { first, second } => {
                write!(f, "{first} and {second} cannot be used together")
            }
            Self::InvalidInstant { input } => write!(f, "invalid instant: {input}"),
            Self::NonexistentLocalTime { local } => {
                write!(f, "local time {local} does not exist in the given time zone")
            }
            Self::UnknownTimeZone { id } => write!(f, "unknown time zone: {id}"),
            Self::InvertedRange { start, end } => write!(f, "{start} must not be after {end}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "to" };
        assert_eq!(err.to_string(), "to must not be empty");

        let err = ValidationError::ForbiddenField {
            field: "header",
            context: "TEXT",
        };
        assert_eq!(err.to_string(), "header is not allowed for TEXT");

        let err = ValidationError::MissingField {
            field: "imageId",
            context: "IMAGE",
        };
        assert_eq!(err.to_string(), "imageId is required for IMAGE");

        let err = ValidationError::TooFewItems {
            field: "subWideItemList",
            min: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "subWideItemList needs at least 3 items, got 2"
        );

        let err = ValidationError::OutOfRange {
            field: "replyRange",
            min: 1,
            max: 9,
            actual: 10,
        };
        assert_eq!(
            err.to_string(),
            "replyRange out of range: 10 (expected 1..=9)"
        );

        let err = ValidationError::ConflictingFields {
            first: "kakaoOptions",
            second: "voiceOptions",
        };
        assert_eq!(
            err.to_string(),
            "kakaoOptions and voiceOptions cannot be used together"
        );
    }
}
