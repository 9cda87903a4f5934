pub mod auth;
pub mod availability;
pub mod booking;
pub mod document;
pub mod field;
pub mod id;
pub mod review;
pub mod role;
pub mod slot;
pub mod user;
