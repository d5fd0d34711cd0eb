//! CareerVue contact-message core: keyword sentiment scoring plus the inbox service that
//! feeds it.

pub mod config;
pub mod error;
pub mod messages;
pub mod sentiment;
pub mod telemetry;
