//! Core domain types shared by the calculator, accent and theme modules.

mod colour;

pub use colour::{Colour, ParseColourError};
