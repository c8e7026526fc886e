//! Integration tests for the issuer workspace.

pub mod ledger;

pub mod distribute_tests;
pub mod transfer_tests;
