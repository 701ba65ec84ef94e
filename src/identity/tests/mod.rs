//! Unit tests for the identity module.
//!
//! Domain tests cover value validation and name parsing; service tests
//! exercise registration, login, guest login, and token resolution against
//! the in-memory adapters.
