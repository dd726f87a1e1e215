pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod editor;
pub mod models;
pub mod photos;
pub mod pricing;
pub mod render;
pub mod session;
