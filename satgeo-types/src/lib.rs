extern crate nalgebra as na;

pub mod congestion;
pub mod elements;
pub mod geodetic;
pub mod graph;
pub mod observer;
pub mod prelude;
pub mod state;
pub mod visibility;
