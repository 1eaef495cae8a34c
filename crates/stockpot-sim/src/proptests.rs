//! Property-based tests for the tick engine.
