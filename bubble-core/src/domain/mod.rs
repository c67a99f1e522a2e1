//! Core domain types
//!
//! Enumerations the master encodes as bare integers on the wire. Both keep an
//! `Other` variant so a newer master never breaks decoding.

pub mod cron;
pub mod status;
