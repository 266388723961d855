pub mod base;
pub mod ease;
pub mod parallel;
pub mod sequence;
pub mod target;
pub mod transforms;

#[cfg(test)]
#[path = "../../tests/unit/animation/probe.rs"]
pub(crate) mod probe;
