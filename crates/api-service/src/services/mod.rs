//! Use-cases that compose more than one repository call inside a single
//! `DatabaseManager::with_tx` unit of work (`spec.md` §4.1). HTTP routing
//! itself is out of scope for the persistence core, but this is exactly the
//! composition the transaction manager exists to make safe, so it lives
//! here rather than inline in a handler.

pub mod use_cases;
