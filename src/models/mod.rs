// src/models/mod.rs
pub mod facility;
pub mod member;
pub mod notice;
pub mod slot;
pub mod staff;
