//! Test suites for the Gantry daemon lifecycle.

mod support;
