pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod external;
pub mod sink;
pub mod store;
pub mod views;

#[cfg(test)]
mod testing;
