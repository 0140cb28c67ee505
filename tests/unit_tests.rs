//! Unit test aggregation for individual components.

mod unit;
