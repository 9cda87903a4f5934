pub mod auth;
pub mod booking;
pub mod document;
pub mod field;
pub mod health;
pub mod review;
pub mod user;
