pub mod auth_service;
pub mod avatar;
pub mod password;
pub mod room_lifecycle;
pub mod stay;
