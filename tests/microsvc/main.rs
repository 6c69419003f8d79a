//! Command service integration tests.

mod dispatch;
