mod client;
mod models;

pub use client::{DeezerClient, DeezerClientBuilder};
