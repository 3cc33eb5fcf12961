//! Application services.

pub mod source_context;
pub mod tank_service;
