//! Shared utilities for the parlor chat relay.

pub mod logger;
