//! Cross-format tests for the mesh readers and writers

pub mod format_tests;
