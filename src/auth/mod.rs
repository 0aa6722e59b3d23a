//! Outbound credential acquisition and caching

pub mod cache;
pub mod client;

pub use cache::{CredentialCache, CredentialSource};
pub use client::{OAuthTokenClient, TokenEndpoint, TokenResponse};
