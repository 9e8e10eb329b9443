//! datecodec-core
//!
//! JSON wire 上の `"Mon, 02 Jan 2006 15:04:05 -0700"` 形式の日付と、
//! offset を保持した `chrono::DateTime<FixedOffset>` を相互変換する。
//!
//! # モジュール構成
//! - **date**: `DateCodec` 本体（decode / encode, serde 連携）
//! - **layout**: 唯一受け付ける layout の厳密な parser / printer
//! - **range**: `{"from", "to"}` 形式の `DateRange`
//! - **serde**: `DateTime<FixedOffset>` フィールド向けの `#[serde(with)]` helper
//! - **error**: `FormatError`
//!
//! ```
//! use datecodec_core::DateCodec;
//!
//! let date = DateCodec::decode(br#""Mon, 02 Jan 2016 15:04:05 -0700""#).unwrap();
//! // 2016-01-02 は土曜日なので、曜日は日付から再計算される
//! assert_eq!(date.encode().unwrap(), br#""Sat, 02 Jan 2016 15:04:05 -0700""#);
//! ```

pub mod date;
pub mod error;
pub mod layout;
pub mod range;
pub mod serde;

pub use self::date::DateCodec;
pub use self::error::FormatError;
pub use self::layout::LAYOUT;
pub use self::range::DateRange;
