// src/crawler/mod.rs
pub mod config;
pub mod orchestrator;

pub use config::CrawlConfig;
pub use orchestrator::Crawler;
