//! Domain records for accounts, QR codes, favorites and daily statistics.
//!
//! # Invariants
//! - Every persisted record is identified by an integer primary key.
//! - Foreign-key relations (user → QR codes, user → favorites) are enforced
//!   by storage, not by these structs.

pub mod favorite;
pub mod qr_code;
pub mod statistics;
pub mod user;
pub mod validation;
