//! Unit tests for the chunk codec and outbound chunker.

mod header_tests;
