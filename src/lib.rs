pub mod address_file;
pub mod balance;
pub mod config;
pub mod dispatcher;
pub mod fetcher;
pub mod scan;
