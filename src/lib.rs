//! Builds the scorigami grid for a history of game results: every possible (winning score, losing score)
//! pair from a fixed floor up to the highest observed score, marking which have occurred and listing the
//! games that produced them.

pub mod csv;
pub mod data;
pub mod file;
pub mod grid;
pub mod pipeline;
pub mod print;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
