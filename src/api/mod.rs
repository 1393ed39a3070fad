//! API module - REST handlers and DTOs

pub mod dto;
pub mod rest;

pub use rest::create_router;
