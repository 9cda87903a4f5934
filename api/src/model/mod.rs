pub mod booking;
pub mod field;
pub mod payment;
pub mod review;
