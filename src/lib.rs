pub mod api;
pub mod cache;
pub mod db;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod pricing;
pub mod queue;
pub mod server;
pub mod validation;
pub mod worker;
