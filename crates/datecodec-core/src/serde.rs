//! `DateTime<FixedOffset>` フィールド向けの `#[serde(with = "...")]` helper
//!
//! [`DateCodec`](crate::DateCodec) で包まずに chrono の型のまま使いたい場合に使う。
//! wire 上の layout は同じ。
//!
//! ```
//! use chrono::{DateTime, FixedOffset};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Event {
//!     #[serde(with = "datecodec_core::serde::rfc1123z")]
//!     at: DateTime<FixedOffset>,
//!     #[serde(default, with = "datecodec_core::serde::rfc1123z::option")]
//!     until: Option<DateTime<FixedOffset>>,
//! }
//!
//! let event: Event = serde_json::from_str(
//!     r#"{"at":"Mon, 02 Jan 2016 15:04:05 -0700","until":null}"#,
//! ).unwrap();
//! assert_eq!(event.at.offset().local_minus_utc(), -7 * 3600);
//! assert!(event.until.is_none());
//! ```

/// `DateTime<FixedOffset>` 用
pub mod rfc1123z {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::DateCodec;

    pub fn serialize<S: Serializer>(
        value: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        DateCodec::new(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        DateCodec::deserialize(deserializer).map(DateCodec::into_inner)
    }

    /// `Option<DateTime<FixedOffset>>` 用。`null` は `None` に対応する
    pub mod option {
        use chrono::{DateTime, FixedOffset};
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        use crate::DateCodec;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<FixedOffset>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            value.map(DateCodec::new).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
            Option::<DateCodec>::deserialize(deserializer)
                .map(|date| date.map(DateCodec::into_inner))
        }
    }
}
