//! Membership reporting core.
//!
//! Three reports over a bulk extract of membership records:
//!   - the active-client roster (current or as of a past date),
//!   - a month-end history of active counts,
//!   - per-membership cost and margin figures.
//!
//! Every report is a pure function of its inputs and an explicit date.

pub mod calendar;
pub mod coach;
pub mod config;
pub mod cost;
pub mod demo;
pub mod error;
pub mod membership;
pub mod monthly;
pub mod name_generator;
pub mod report;
pub mod resolver;
pub mod rng;
pub mod source;
pub mod store;
pub mod types;
