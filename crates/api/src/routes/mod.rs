//! HTTP Routes

pub mod vehicles;
