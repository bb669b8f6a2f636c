//! Integration tests
//!
//! `api_tests` drive the full router in process against the in-memory store.
//! `postgres_tests` need a database and are ignored by default:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

mod api_tests;
