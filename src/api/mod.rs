//! Form API module for HTTP communication

mod client;
mod error;
mod traits;

pub use client::HttpFormClient;
pub use error::ApiError;
pub use traits::FormApi;

#[cfg(test)]
pub use traits::MockFormApi;
