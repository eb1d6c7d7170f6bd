//! HTTP access to hosted inference models.

mod client;
mod response;
mod retry;

pub use client::InferenceClient;
pub use response::{InferenceOutput, LabelScore};
pub use retry::retry_budget;
