// src/services/mod.rs
pub mod auth_service;
pub mod facility_service;
pub mod member_service;
pub mod request_builder;
pub mod slot_generator;
pub mod slot_service;
pub mod staff_service;
pub mod time_window;
