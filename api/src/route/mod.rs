pub mod booking;
pub mod field;
pub mod health;
pub mod v1;
