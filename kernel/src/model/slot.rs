use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 予約対象の時間帯。[start_time, end_time) の半開区間として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeSlot {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            end_time,
        }
    }

    /// 予約開始の日時。
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.date == other.date
            && overlaps(
                self.start_time,
                self.end_time,
                other.start_time,
                other.end_time,
            )
    }

    pub fn duration_hours(&self) -> Decimal {
        duration_hours(self.start_time, self.end_time)
    }
}

/// 半開区間同士の重なり判定。端が接するだけ（a_end == b_start）は重ならない。
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// 同一日内の時間帯の長さを時間単位で返す。分単位の端数は小数になる。
pub fn duration_hours(start: NaiveTime, end: NaiveTime) -> Decimal {
    let minutes = (end - start).num_minutes();
    Decimal::from(minutes) / dec!(60)
}

/// 日付 + 時刻を now と比較し、すでに過ぎている（同時刻を含む）かを返す。
pub fn is_past(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> bool {
    date.and_time(time) <= now
}

/// 表示用の固定グリッドの範囲。08:00〜22:00 を 1 時間刻みで 14 枠。
pub const GRID_OPEN_HOUR: u32 = 8;
pub const GRID_CLOSE_HOUR: u32 = 22;

pub fn day_grid() -> Vec<(NaiveTime, NaiveTime)> {
    (GRID_OPEN_HOUR..GRID_CLOSE_HOUR)
        .map(|h| {
            (
                NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(h + 1, 0, 0).unwrap(),
            )
        })
        .collect()
}

/// "HH:MM" 形式の文字列をパースする。秒以下は受け付けない。
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    if value.len() != 5 {
        return None;
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    (time.second() == 0).then_some(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!overlaps(t(10, 0), t(11, 0), t(11, 0), t(12, 0)));
        assert!(!overlaps(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
    }

    #[test]
    fn partial_overlap_is_detected() {
        assert!(overlaps(t(10, 0), t(11, 0), t(10, 30), t(11, 30)));
        assert!(overlaps(t(10, 30), t(11, 30), t(10, 0), t(11, 0)));
    }

    #[test]
    fn containment_is_overlap() {
        assert!(overlaps(t(9, 0), t(13, 0), t(10, 0), t(11, 0)));
        assert!(overlaps(t(10, 0), t(11, 0), t(9, 0), t(13, 0)));
    }

    #[test]
    fn duration_is_computed_in_hours() {
        assert_eq!(duration_hours(t(14, 0), t(16, 0)), dec!(2));
        assert_eq!(duration_hours(t(14, 0), t(15, 30)), dec!(1.5));
    }

    #[test]
    fn past_check_includes_exact_instant() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let now = date.and_time(t(10, 0));
        assert!(is_past(date, t(9, 0), now));
        assert!(is_past(date, t(10, 0), now));
        assert!(!is_past(date, t(10, 1), now));
    }

    #[test]
    fn grid_has_fourteen_hourly_slots() {
        let grid = day_grid();
        assert_eq!(grid.len(), 14);
        assert_eq!(grid[0], (t(8, 0), t(9, 0)));
        assert_eq!(grid[13], (t(21, 0), t(22, 0)));
    }

    #[test]
    fn parse_time_rejects_malformed_input() {
        assert_eq!(parse_time("08:30"), Some(t(8, 30)));
        assert_eq!(parse_time("23:59"), Some(t(23, 59)));
        assert!(parse_time("24:00").is_none());
        assert!(parse_time("12:60").is_none());
        assert!(parse_time("9:00").is_none());
        assert!(parse_time("09:00:00").is_none());
        assert!(parse_time("morning").is_none());
    }
}
