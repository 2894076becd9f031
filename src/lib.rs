//! Bandwidth summaries for device memory-transfer traces.
//!
//! A trace is a list of [`trace::event::TransferEvent`]s per
//! [`trace::event::Category`]. Each category is aggregated per channel and
//! size by [`summary::aggregate`], then rendered by [`summary::Reporter`].

pub mod config;
pub mod summary;
pub mod trace;
