pub mod admission_service;
pub mod session_service;
