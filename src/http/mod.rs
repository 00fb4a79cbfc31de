// HTTP transport shared by the platform and spreadsheet clients

pub mod client;

pub use client::RateLimitedHttpClient;
