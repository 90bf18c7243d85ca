//! Foundational types: members, ledger records, balance sheets.

pub mod balance;
pub mod member;
pub mod record;
