pub mod kiosk_config;

pub use kiosk_config::KioskConfig;
