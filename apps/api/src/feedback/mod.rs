pub mod handlers;
pub mod query;
pub mod service;
pub mod table;
pub mod watchlist;
pub mod workflow;
