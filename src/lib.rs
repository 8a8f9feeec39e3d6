//! # Frank Energie Rust client
//!
//! A Rust client for the Frank Energie GraphQL API, covering
//! authentication, market prices, invoices, usage, and smart-battery
//! telemetry.
//!
//! ## Overview
//!
//! This crate provides:
//! - The [`FrankEnergie`] client with one method per API operation
//! - A request pipeline mapping transport, HTTP-status, and GraphQL-level
//!   failures onto the typed [`FrankEnergieError`] taxonomy
//! - [`Authentication`] credential handling for the login/renew-token flow
//! - Typed response models in [`models`], decoded from response envelopes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use frank_energie::FrankEnergie;
//!
//! let mut client = FrankEnergie::new();
//! client.login("user@example.com", "password").await?;
//!
//! let sites = client.user_sites().await?;
//! if let Some(site) = sites.in_delivery().first() {
//!     let summary = client.month_summary(&site.reference).await?;
//!     println!("Expected costs: {:?}", summary.expected_costs);
//! }
//! ```
//!
//! ## Market prices without an account
//!
//! The general and Belgian price queries need no credentials:
//!
//! ```rust,ignore
//! use frank_energie::FrankEnergie;
//!
//! let client = FrankEnergie::new();
//! let prices = client.prices(None, None).await?;
//! for price in &prices.electricity.all {
//!     println!("{} -> {}: {:.4}", price.date_from, price.date_till, price.total());
//! }
//! ```
//!
//! ## Restoring a session
//!
//! ```rust,ignore
//! use frank_energie::FrankEnergie;
//!
//! let mut client = FrankEnergie::new().with_tokens(stored_auth, stored_refresh);
//! if !client.is_authenticated() {
//!     client.renew_token().await?;
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is instance-based and passed
//!   explicitly
//! - **Fail-fast validation**: caller arguments are checked before any
//!   network call
//! - **Thread-safe**: the client is `Send + Sync`; read operations take
//!   `&self`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

// Re-export public types at crate root for convenience
pub use auth::Authentication;
pub use client::{FrankEnergie, GraphQlQuery};
pub use config::ApiConfig;
pub use error::FrankEnergieError;
pub use models::Decodable;
