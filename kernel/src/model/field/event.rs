use crate::model::field::Surface;
use rust_decimal::Decimal;

pub struct CreateField {
    pub name: String,
    pub description: String,
    pub address: String,
    pub price_per_hour: Decimal,
    pub surface: Surface,
}
