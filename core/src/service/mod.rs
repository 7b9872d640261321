pub mod dto;
pub mod progress_service;
