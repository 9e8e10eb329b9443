//! DateRange - `{"from": ..., "to": ...}` 形式のドキュメント
//!
//! decode 時に from <= to は検証しない（業務的な検証は呼び出し側の責務）。

use chrono::{DateTime, Duration, TimeZone};
use serde::{Deserialize, Serialize};

use crate::date::DateCodec;

/// from / to の 2 つの DateCodec からなる期間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateCodec,
    pub to: DateCodec,
}

impl DateRange {
    /// from / to から DateRange を作成（順序は検証しない）
    pub fn new(from: DateCodec, to: DateCodec) -> Self {
        Self { from, to }
    }

    /// `to - from`。順序が逆なら負になる
    pub fn span(&self) -> Duration {
        self.to.instant() - self.from.instant()
    }

    /// from <= to か
    pub fn is_ordered(&self) -> bool {
        self.from <= self.to
    }

    /// 両端を含む。順序が逆の range では常に false
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let at = instant.fixed_offset();
        self.from.instant() <= at && at <= self.to.instant()
    }
}
