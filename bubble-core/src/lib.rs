//! Bubble Core
//!
//! Core types shared by the Bubble master client and the portal state.
//!
//! This crate contains:
//! - Domain types: status codes and cron recurrence kinds
//! - DTOs: the `{status, data}` envelope and the records carried inside it

pub mod domain;
pub mod dto;
