pub mod music;
pub mod platform;
pub mod session;
