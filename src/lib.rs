//! Core of the infinote audio ripping service.
//!
//! A submission names a remote media source; the core tracks one job per
//! (owner, source) pair through a fetch → transcode pipeline and exposes a
//! consistent view of every in-flight and completed job to concurrent
//! readers. The HTTP layer, user accounts and the real download/transcode
//! implementations live outside this crate and plug in through the traits in
//! [`media`] and [`jobs`].

pub mod config;
pub mod jobs;
pub mod media;
