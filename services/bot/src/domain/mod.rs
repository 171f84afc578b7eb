pub mod action;
pub mod repository;
pub mod types;
