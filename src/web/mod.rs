// src/web/mod.rs
pub mod api_error;
pub mod auth_handlers;
pub mod facility_handlers;
pub mod flash;
pub mod member_handlers;
pub mod mw_admin;
pub mod mw_auth;
pub mod notice_handlers;
pub mod routes;
pub mod slot_handlers;
