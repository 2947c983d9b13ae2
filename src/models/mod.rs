//! Data models for Bookyard entities

pub mod book;
pub mod credits;
pub mod enums;
pub mod profile;
pub mod reservation;
