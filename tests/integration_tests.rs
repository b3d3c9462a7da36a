//! Entry point cargo actually compiles as a test binary; `tests/common` and
//! `tests/integration` are plain modules pulled in from here since cargo
//! only auto-discovers files directly under `tests/`.

#[path = "common/mod.rs"]
mod common;

#[path = "integration/mod.rs"]
mod integration;
