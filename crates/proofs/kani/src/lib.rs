//! Formal verification harnesses for the xyk pool
//!
//! Run with: cargo kani -p proofs-kani

#![cfg(kani)]

mod pool;
