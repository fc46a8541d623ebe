pub mod accounts;
pub mod auth;
pub mod bids;
pub mod cars;
pub mod rentals;
