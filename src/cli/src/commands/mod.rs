//! Commands of the `issuer` binary.

pub mod benched;
pub mod checksum;
pub mod distribute;
pub mod down;
pub mod sign;
pub mod supply;
