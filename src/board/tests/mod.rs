//! Unit tests for the board module.
//!
//! Domain tests cover value validation and aggregate invariants; the
//! service tests exercise the board, task, and comment workflows against
//! the in-memory store, including the policy decisions behind them.
