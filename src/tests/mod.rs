//! Scenario tests that run the whole pipeline from a local instant to the
//! daily report.
