use chrono::{Duration, NaiveDate};
use garde::Validate;
use kernel::model::{
    availability::{DayAvailability, SlotAvailability, SlotBlock},
    field::{Field, FieldStatus, Surface},
    id::FieldId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

const DEFAULT_AVAILABILITY_DAYS: i64 = 7;
const MAX_AVAILABILITY_DAYS: i64 = 30;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFieldRequest {
    #[garde(length(min = 1, max = 120))]
    pub name: String,
    #[garde(length(max = 1000))]
    pub description: String,
    #[garde(length(min = 1, max = 255))]
    pub address: String,
    #[garde(custom(non_negative))]
    pub price_per_hour: Decimal,
    #[garde(skip)]
    pub surface: Surface,
}

fn non_negative(value: &Decimal, _ctx: &()) -> garde::Result {
    if value.is_sign_negative() {
        return Err(garde::Error::new("must not be negative"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AvailabilityQuery {
    /// 省略時は今日から 1 週間後まで（起点を含め 8 日分）。
    /// 予約フローが先読みする 30 日先（今日を含め 31 日分）までは許可する。
    pub fn resolve_range(&self, today: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
        let from = self.from.unwrap_or(today);
        let to = self
            .to
            .unwrap_or(from + Duration::days(DEFAULT_AVAILABILITY_DAYS));
        if to < from {
            return Err(AppError::UnprocessableEntity(
                "availability range is inverted".into(),
            ));
        }
        if (to - from).num_days() > MAX_AVAILABILITY_DAYS {
            return Err(AppError::UnprocessableEntity(
                "availability range is too wide".into(),
            ));
        }
        Ok((from, to))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResponse {
    pub field_id: FieldId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub price_per_hour: Decimal,
    pub surface: Surface,
    pub status: FieldStatus,
    pub rating_average: Decimal,
    pub rating_count: i64,
}

impl From<Field> for FieldResponse {
    fn from(value: Field) -> Self {
        let Field {
            field_id,
            name,
            description,
            address,
            price_per_hour,
            surface,
            status,
            rating,
        } = value;
        Self {
            field_id,
            name,
            description,
            address,
            price_per_hour,
            surface,
            status,
            rating_average: rating.average,
            rating_count: rating.count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsResponse {
    pub items: Vec<FieldResponse>,
}

impl From<Vec<Field>> for FieldsResponse {
    fn from(value: Vec<Field>) -> Self {
        Self {
            items: value.into_iter().map(FieldResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailabilityResponse {
    pub start_time: String,
    pub end_time: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    pub price_per_hour: Decimal,
}

impl From<SlotAvailability> for SlotAvailabilityResponse {
    fn from(value: SlotAvailability) -> Self {
        Self {
            start_time: value.start_time.format("%H:%M").to_string(),
            end_time: value.end_time.format("%H:%M").to_string(),
            available: value.available,
            reason: value.reason.map(|r| match r {
                SlotBlock::Past => "past",
                SlotBlock::Booked => "booked",
            }),
            price_per_hour: value.price,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailabilityResponse {
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailabilityResponse>,
}

impl From<DayAvailability> for DayAvailabilityResponse {
    fn from(value: DayAvailability) -> Self {
        Self {
            date: value.date,
            slots: value
                .slots
                .into_iter()
                .map(SlotAvailabilityResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub field_id: FieldId,
    pub days: Vec<DayAvailabilityResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn query(from: Option<NaiveDate>, to: Option<NaiveDate>) -> AvailabilityQuery {
        AvailabilityQuery { from, to }
    }

    #[test]
    fn default_range_spans_eight_dates() {
        let (from, to) = query(None, None).resolve_range(today()).unwrap();
        assert_eq!(from, today());
        assert_eq!(to, today() + Duration::days(7));
    }

    #[test]
    fn thirty_days_ahead_is_accepted() {
        // 予約フローは今日から 30 日先まで先読みする
        let to = today() + Duration::days(30);
        let range = query(None, Some(to)).resolve_range(today()).unwrap();
        assert_eq!(range, (today(), to));
    }

    #[test]
    fn range_beyond_thirty_days_is_rejected() {
        let to = today() + Duration::days(31);
        assert!(matches!(
            query(None, Some(to)).resolve_range(today()),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let from = today() + Duration::days(3);
        assert!(query(Some(from), Some(today()))
            .resolve_range(today())
            .is_err());
    }
}
