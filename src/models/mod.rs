pub mod application;
pub mod booking;
pub mod common;
