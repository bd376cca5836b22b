//! HTTP gateway for the paperchute batch submission service.

pub mod api;
pub mod metrics;
pub mod state;
