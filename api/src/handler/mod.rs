pub mod booking;
pub mod field;
pub mod health;
pub mod payment;
pub mod review;
