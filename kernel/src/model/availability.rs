use crate::model::{
    booking::BookingStatus,
    slot::{self, TimeSlot},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// フィールド + 日付に対する予約済み時間帯（終端状態でないもの）。
#[derive(Debug)]
pub struct SlotOccupancy {
    pub slot: TimeSlot,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotBlock {
    Past,
    Booked,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub available: bool,
    pub price: Decimal,
    pub reason: Option<SlotBlock>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailability>,
}

/// 固定グリッドと予約済み区間を突き合わせた 1 日分の空き状況。
/// 読み取り専用の射影であり、結果は返した時点で古くなりうる。
/// 予約可否の最終判定は予約作成側が行う。
pub fn project_day(
    date: NaiveDate,
    price_per_hour: Decimal,
    occupied: &[TimeSlot],
    now: NaiveDateTime,
) -> DayAvailability {
    let slots = slot::day_grid()
        .into_iter()
        .map(|(start, end)| {
            let is_past = slot::is_past(date, start, now);
            let is_booked = occupied
                .iter()
                .any(|b| b.date == date && slot::overlaps(start, end, b.start_time, b.end_time));
            let reason = if is_past {
                Some(SlotBlock::Past)
            } else if is_booked {
                Some(SlotBlock::Booked)
            } else {
                None
            };
            SlotAvailability {
                start_time: start,
                end_time: end,
                available: reason.is_none(),
                price: price_per_hour,
                reason,
            }
        })
        .collect();

    DayAvailability { date, slots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    // 前日の時点から見た日なので過去スロットは発生しない
    fn early_now() -> NaiveDateTime {
        date().pred_opt().unwrap().and_time(t(12, 0))
    }

    #[test]
    fn booked_slot_is_marked_with_reason() {
        let occupied = vec![TimeSlot::new(date(), t(14, 0), t(15, 0))];
        let day = project_day(date(), dec!(40), &occupied, early_now());

        assert_eq!(day.slots.len(), 14);
        for s in &day.slots {
            if s.start_time == t(14, 0) {
                assert!(!s.available);
                assert_eq!(s.reason, Some(SlotBlock::Booked));
            } else {
                assert!(s.available, "slot at {} should be free", s.start_time);
                assert_eq!(s.reason, None);
            }
            assert_eq!(s.price, dec!(40));
        }
    }

    #[test]
    fn off_grid_booking_blocks_both_touched_slots() {
        // 18:30-19:30 はグリッドの 18 時台と 19 時台の両方に重なる
        let occupied = vec![TimeSlot::new(date(), t(18, 30), t(19, 30))];
        let day = project_day(date(), dec!(50), &occupied, early_now());

        let blocked: Vec<_> = day
            .slots
            .iter()
            .filter(|s| !s.available)
            .map(|s| s.start_time)
            .collect();
        assert_eq!(blocked, vec![t(18, 0), t(19, 0)]);
    }

    #[test]
    fn past_takes_precedence_over_booked() {
        let occupied = vec![TimeSlot::new(date(), t(8, 0), t(9, 0))];
        let now = date().and_time(t(12, 0));
        let day = project_day(date(), dec!(40), &occupied, now);

        // 12:00 開始枠まではすべて past（12:00 ちょうども過去扱い）
        for s in &day.slots {
            if s.start_time <= t(12, 0) {
                assert_eq!(s.reason, Some(SlotBlock::Past));
            } else {
                assert_eq!(s.reason, None);
            }
        }
    }

    #[test]
    fn other_dates_do_not_affect_projection() {
        let other_day = date().succ_opt().unwrap();
        let occupied = vec![TimeSlot::new(other_day, t(14, 0), t(15, 0))];
        let day = project_day(date(), dec!(40), &occupied, early_now());
        assert!(day.slots.iter().all(|s| s.available));
    }
}
