pub mod appointment;
pub mod notification;
pub mod service;
pub mod subscription;
