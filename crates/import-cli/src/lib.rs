//! Library components of the `csv-import` command.

#![deny(unsafe_code)]

pub mod edits;
pub mod logging;
pub mod sink;
