pub mod booking;
pub mod document;
pub mod field;
pub mod review;
pub mod user;
