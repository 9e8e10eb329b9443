//! Layout - `"Mon, 02 Jan 2006 15:04:05 -0700"` の厳密な parser / printer
//!
//! 受け付ける layout は 1 つだけ。固定幅 31 バイトで、各フィールドの位置は決まっている。
//!
//! ```text
//! Mon, 02 Jan 2006 15:04:05 -0700
//! ^^^  ^^ ^^^ ^^^^ ^^ ^^ ^^ ^^^^^
//! 曜日 日 月  年   時 分 秒 offset
//! ```
//!
//! # 曜日の扱い
//! parse 時、曜日トークンは 7 つの英語略称のいずれかであることだけを確認し、
//! 日付との整合性は検証しない。format 時は日付から曜日を再計算する。

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime};

use crate::error::FormatError;

/// 受け付ける唯一の layout（参照用の表記）
pub const LAYOUT: &str = "Mon, 02 Jan 2006 15:04:05 -0700";

/// chrono の strftime 表記での同じ layout（format 専用）
const STRFTIME: &str = "%a, %d %b %Y %H:%M:%S %z";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// JSON の quote を外した `input` を parse
///
/// 返す instant は文字列に書かれた UTC offset をそのまま保持する（UTC / local に正規化しない）。
pub fn parse(input: &str) -> Result<DateTime<FixedOffset>, FormatError> {
    let mut p = Parser::new(input);

    p.name(&WEEKDAYS, "expected a three-letter weekday name")?;
    p.byte(b',', "expected ',' after the weekday")?;
    p.byte(b' ', "expected ' ' after ','")?;
    let day = p.digits(2, "expected a two-digit day")?;
    p.byte(b' ', "expected ' ' after the day")?;
    let month = p.name(&MONTHS, "expected a three-letter month name")? as u32 + 1;
    p.byte(b' ', "expected ' ' after the month")?;
    let year = p.digits(4, "expected a four-digit year")?;
    p.byte(b' ', "expected ' ' after the year")?;
    let hour = p.digits(2, "expected a two-digit hour")?;
    p.byte(b':', "expected ':' after the hour")?;
    let minute = p.digits(2, "expected a two-digit minute")?;
    p.byte(b':', "expected ':' after the minute")?;
    let second = p.digits(2, "expected a two-digit second")?;
    p.byte(b' ', "expected ' ' before the UTC offset")?;
    let sign = p.sign("expected '+' or '-' at the start of the UTC offset")?;
    let offset_hours = p.digits(2, "expected a four-digit UTC offset")?;
    let offset_minutes = p.digits(2, "expected a four-digit UTC offset")?;
    p.finish("unexpected trailing input after the UTC offset")?;

    if hour > 23 {
        return Err(FormatError::range(input, "hour must be in 00..=23"));
    }
    if minute > 59 {
        return Err(FormatError::range(input, "minute must be in 00..=59"));
    }
    if second > 59 {
        return Err(FormatError::range(input, "second must be in 00..=59"));
    }
    if offset_hours > 23 || offset_minutes > 59 {
        return Err(FormatError::range(input, "UTC offset must be within -2359..=+2359"));
    }

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| FormatError::range(input, "day does not exist in the given month"))?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| FormatError::range(input, "invalid time of day"))?;
    let offset_secs = sign * (offset_hours * 3600 + offset_minutes * 60) as i32;
    let offset = FixedOffset::east_opt(offset_secs)
        .ok_or_else(|| FormatError::range(input, "UTC offset out of range"))?;

    date.and_time(time)
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| FormatError::range(input, "instant is not representable"))
}

/// `dt` を layout で書き出す（曜日は現地日付から再計算）
///
/// `0000..=9999` 以外の年は 4 桁で書けないため [`FormatError::Encode`] を返す。
pub fn format(dt: &DateTime<FixedOffset>) -> Result<String, FormatError> {
    let year = dt.year();
    if !(0..=9999).contains(&year) {
        return Err(FormatError::Encode(format!(
            "year {year} does not fit the four-digit layout"
        )));
    }
    Ok(dt.format(STRFTIME).to_string())
}

/// 固定幅 layout 用の小さな cursor
struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn take(&mut self, len: usize, reason: &'static str) -> Result<&'a [u8], FormatError> {
        let end = self.pos + len;
        let chunk = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| FormatError::layout(self.input, reason))?;
        self.pos = end;
        Ok(chunk)
    }

    fn byte(&mut self, want: u8, reason: &'static str) -> Result<(), FormatError> {
        match self.take(1, reason)? {
            [b] if *b == want => Ok(()),
            _ => Err(FormatError::layout(self.input, reason)),
        }
    }

    fn digits(&mut self, len: usize, reason: &'static str) -> Result<u32, FormatError> {
        let chunk = self.take(len, reason)?;
        chunk.iter().try_fold(0u32, |acc, b| {
            if b.is_ascii_digit() {
                Ok(acc * 10 + u32::from(b - b'0'))
            } else {
                Err(FormatError::layout(self.input, reason))
            }
        })
    }

    /// ASCII の大文字小文字を区別せずに照合し、`table` 内の index を返す
    fn name(&mut self, table: &[&str], reason: &'static str) -> Result<usize, FormatError> {
        let chunk = self.take(3, reason)?;
        table
            .iter()
            .position(|name| name.as_bytes().eq_ignore_ascii_case(chunk))
            .ok_or_else(|| FormatError::layout(self.input, reason))
    }

    fn sign(&mut self, reason: &'static str) -> Result<i32, FormatError> {
        match self.take(1, reason)? {
            [b'+'] => Ok(1),
            [b'-'] => Ok(-1),
            _ => Err(FormatError::layout(self.input, reason)),
        }
    }

    fn finish(&self, reason: &'static str) -> Result<(), FormatError> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(FormatError::layout(self.input, reason))
        }
    }
}
