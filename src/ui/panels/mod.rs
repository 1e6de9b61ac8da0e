// EventFiend - ui/panels/mod.rs

pub mod about;
pub mod connect;
pub mod detail;
pub mod entries;
pub mod filters;
pub mod logs;
pub mod message;
