//! The type universe.
//!
//! Types are slots in an arena. Declarations may allocate a `Pending` slot
//! before its contents are known; resolution later fills the same slot in
//! place, so every earlier reference sees the final type.

pub mod types;
