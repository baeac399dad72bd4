//! wxMaxima worksheet parser.
//!
//! This crate provides a `MathParser` to turn the XML that wxMaxima stores in
//! `.wxmx` files (and the math lines Maxima prints) into a tree of typed cells
//! ready for layout.
//!
//! The binary `mathcells` demonstrates usage and prints an outline or JSON.

pub mod config;
pub mod model;
pub mod parser;
pub mod worksheet;
