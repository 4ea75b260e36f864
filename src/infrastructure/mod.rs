pub mod config;
pub mod csv;
pub mod store;
pub mod translations;
