//! DateCodec - wire 上の日付文字列と offset 付き instant の相互変換
//!
//! `DateCodec` は `serde::{Serialize, Deserialize}` を手書きで実装しているので、
//! 構造体のフィールド、ネストしたオブジェクト、配列の要素、`Option` のどこに置いても
//! serde_json が自動的に decode / encode を呼び出す。

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormatError;
use crate::layout;

/// DateCodec は wire 上で `"Mon, 02 Jan 2006 15:04:05 -0700"` として流れる timestamp
///
/// # 等価性
/// - `PartialEq` / `Hash` / `Ord` は instant だけを比較する
/// - offset が違っても同じ瞬間なら等しい
/// - offset まで比較したい場合は [`DateCodec::same_offset`] を使う
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateCodec {
    instant: DateTime<FixedOffset>,
}

impl DateCodec {
    /// instant から DateCodec を作成（offset はそのまま保持）
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// JSON トークンを decode
    ///
    /// トークンは layout に一致する JSON 文字列でなければならない。
    /// 文字列以外のトークンは [`FormatError::NotAString`]。
    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        let value: Value = serde_json::from_slice(bytes)?;
        match value {
            Value::String(text) => text.parse(),
            other => {
                let found = json_kind(&other);
                tracing::debug!(found, "rejected non-string token");
                Err(FormatError::NotAString { found })
            }
        }
    }

    /// JSON 文字列として encode（曜日は日付から再計算）
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        let text = self.to_wire_string()?;
        tracing::trace!(%text, "encoded timestamp");
        serde_json::to_vec(&text).map_err(|err| FormatError::Encode(err.to_string()))
    }

    /// JSON の quote なしの layout テキスト
    pub fn to_wire_string(&self) -> Result<String, FormatError> {
        layout::format(&self.instant)
    }

    /// 内部の instant を取得
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// decode 時に文字列に書かれていた UTC offset
    pub fn offset(&self) -> FixedOffset {
        *self.instant.offset()
    }

    /// UTC に変換した instant
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.instant.with_timezone(&Utc)
    }

    /// DateCodec を消費して内部の instant を返す
    pub fn into_inner(self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// instant と UTC offset の両方が同じか
    pub fn same_offset(&self, other: &Self) -> bool {
        self == other && self.offset() == other.offset()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<DateTime<FixedOffset>> for DateCodec {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Self::new(instant)
    }
}

impl From<DateCodec> for DateTime<FixedOffset> {
    fn from(date: DateCodec) -> Self {
        date.instant
    }
}

impl FromStr for DateCodec {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        layout::parse(s).map(Self::new).inspect_err(|err| {
            tracing::debug!(error = %err, "rejected date text");
        })
    }
}

/// 診断用の表示（`2016-01-02 15:04:05 -07:00`）。wire の layout ではない
impl fmt::Display for DateCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.instant, f)
    }
}

impl Serialize for DateCodec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_wire_string().map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for DateCodec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(DateCodecVisitor)
    }
}

struct DateCodecVisitor;

impl Visitor<'_> for DateCodecVisitor {
    type Value = DateCodec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a date string like {:?}", layout::LAYOUT)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<DateCodec, E> {
        value.parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;
    use std::collections::HashSet;

    const FROM: &str = "Mon, 02 Jan 2016 15:04:05 -0700";
    const TO: &str = "Mon, 02 Jan 2016 17:04:05 -0700";

    fn at(offset_hours: i32, h: u32, m: u32, s: u32) -> DateCodec {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        DateCodec::new(offset.with_ymd_and_hms(2016, 1, 2, h, m, s).unwrap())
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Single {
        from: DateCodec,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Pair {
        from: DateCodec,
        to: DateCodec,
    }

    #[derive(Debug, Deserialize)]
    struct Nested {
        daterange: Pair,
    }

    #[test]
    fn decode_reference_string() {
        let date = DateCodec::decode(format!("\"{FROM}\"").as_bytes()).unwrap();

        assert_eq!(date, at(-7, 15, 4, 5));
        assert!(date.same_offset(&at(-7, 15, 4, 5)));
        assert_eq!(date.offset().local_minus_utc(), -7 * 3600);
    }

    #[rstest]
    #[case::number(b"123".as_slice(), "a number")]
    #[case::null(b"null".as_slice(), "null")]
    #[case::object(b"{}".as_slice(), "an object")]
    #[case::array(b"[\"Mon, 02 Jan 2016 15:04:05 -0700\"]".as_slice(), "an array")]
    #[case::boolean(b"true".as_slice(), "a boolean")]
    fn decode_rejects_non_string_tokens(#[case] input: &[u8], #[case] kind: &str) {
        match DateCodec::decode(input) {
            Err(FormatError::NotAString { found }) => assert_eq!(found, kind),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_unquoted_literal() {
        let err = DateCodec::decode(FROM.as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::Json(_)), "{err}");
    }

    #[test]
    fn decode_rejects_iso8601() {
        let err = DateCodec::decode(b"\"2016-01-02T15:04:05-07:00\"").unwrap_err();
        assert!(matches!(err, FormatError::Layout { .. }), "{err}");
    }

    #[test]
    fn encode_recomputes_weekday() {
        let date = DateCodec::decode(format!("\"{FROM}\"").as_bytes()).unwrap();
        let bytes = date.encode().unwrap();
        assert_eq!(bytes, br#""Sat, 02 Jan 2016 15:04:05 -0700""#);
    }

    #[rstest]
    #[case::reference(FROM)]
    #[case::east("Sun, 31 Dec 2023 23:59:59 +1400")]
    #[case::west("Wed, 29 Feb 2012 00:00:00 -1130")]
    #[case::utc("Thu, 01 Jan 1970 00:00:00 +0000")]
    fn encode_then_decode_keeps_instant_and_offset(#[case] text: &str) {
        let first = DateCodec::decode(serde_json::to_vec(text).unwrap().as_slice()).unwrap();
        let second = DateCodec::decode(&first.encode().unwrap()).unwrap();
        assert!(first.same_offset(&second), "{first} vs {second}");
    }

    #[test]
    fn equality_ignores_offset_representation() {
        // 15:04:05 -0700 == 22:04:05 +0000
        let west = at(-7, 15, 4, 5);
        let utc = at(0, 22, 4, 5);

        assert_eq!(west, utc);
        assert!(!west.same_offset(&utc));

        let set: HashSet<_> = [west, utc].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ordering_follows_instant() {
        assert!(at(-7, 15, 4, 5) < at(-7, 17, 4, 5));
        // 16:00 +0000 は 15:04 -0700 (= 22:04 UTC) より前
        assert!(at(0, 16, 0, 0) < at(-7, 15, 4, 5));
    }

    #[test]
    fn display_is_diagnostic_rendering() {
        assert_eq!(at(-7, 15, 4, 5).to_string(), "2016-01-02 15:04:05 -07:00");
    }

    #[test]
    fn struct_with_one_field() {
        let data: Single = serde_json::from_value(json!({ "from": FROM })).unwrap();
        assert_eq!(data.from, at(-7, 15, 4, 5));
    }

    #[test]
    fn struct_with_two_fields() {
        let data: Pair = serde_json::from_value(json!({ "from": FROM, "to": TO })).unwrap();

        assert_eq!(data.from, at(-7, 15, 4, 5));
        assert_eq!(data.to, at(-7, 17, 4, 5));
        assert_eq!((data.to.instant() - data.from.instant()).num_hours(), 2);
    }

    #[test]
    fn nested_struct_decodes_like_top_level() {
        let text = format!(r#"{{"daterange":{{"from":"{FROM}","to":"{TO}"}}}}"#);
        let nested: Nested = serde_json::from_str(&text).unwrap();
        let flat: Pair = serde_json::from_value(json!({ "from": FROM, "to": TO })).unwrap();

        assert!(nested.daterange.from.same_offset(&flat.from));
        assert!(nested.daterange.to.same_offset(&flat.to));
    }

    #[test]
    fn sequence_and_option_fields() {
        #[derive(Debug, Deserialize)]
        struct Doc {
            dates: Vec<DateCodec>,
            maybe: Option<DateCodec>,
            missing: Option<DateCodec>,
        }

        let doc: Doc = serde_json::from_value(json!({
            "dates": [FROM, TO],
            "maybe": FROM,
            "missing": null,
        }))
        .unwrap();

        assert_eq!(doc.dates, vec![at(-7, 15, 4, 5), at(-7, 17, 4, 5)]);
        assert_eq!(doc.maybe, Some(at(-7, 15, 4, 5)));
        assert_eq!(doc.missing, None);
    }

    #[test]
    fn bad_field_fails_whole_document() {
        let err = serde_json::from_value::<Pair>(json!({ "from": FROM, "to": 123 })).unwrap_err();
        assert!(err.to_string().contains("invalid type"), "{err}");

        let err = serde_json::from_value::<Pair>(json!({ "from": FROM, "to": "2016-01-02" }))
            .unwrap_err();
        assert!(err.to_string().contains("does not match layout"), "{err}");
    }

    #[test]
    fn struct_serializes_with_recomputed_weekday() {
        let data = Single { from: at(-7, 15, 4, 5) };
        let text = serde_json::to_string(&data).unwrap();
        assert_eq!(text, r#"{"from":"Sat, 02 Jan 2016 15:04:05 -0700"}"#);
    }

    #[test]
    fn serialize_reports_unrepresentable_year() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let data = Single {
            from: DateCodec::new(offset.with_ymd_and_hms(12345, 1, 1, 0, 0, 0).unwrap()),
        };
        assert!(serde_json::to_string(&data).is_err());
    }

    #[test]
    fn encode_reports_unrepresentable_year_as_encode_error() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let date = DateCodec::new(offset.with_ymd_and_hms(12345, 1, 1, 0, 0, 0).unwrap());

        let err = date.encode().unwrap_err();
        assert!(matches!(err, FormatError::Encode(_)), "{err}");
        assert!(err.to_string().starts_with("failed to encode"), "{err}");
    }

    #[test]
    fn conversions_round_trip_inner_value() {
        let date = at(-7, 15, 4, 5);
        let inner: DateTime<FixedOffset> = date.into();
        assert_eq!(DateCodec::from(inner), date);
        assert_eq!(date.into_inner(), inner);
        assert_eq!(date.to_utc(), Utc.with_ymd_and_hms(2016, 1, 2, 22, 4, 5).unwrap());
    }
}
