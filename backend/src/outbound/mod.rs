//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **payment_gateway**: reqwest-backed client for the payment gateway's
//!   order API.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod payment_gateway;
