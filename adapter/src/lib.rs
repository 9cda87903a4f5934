pub mod database;
pub mod gateway;
pub mod redis;
pub mod repository;
