//! Motion-planning kernel for mobile robots: arc-length parameterized
//! position and pose paths built from geometric directives, and
//! cooperative actions for sequencing robot behavior on a control loop.

pub mod action;
pub mod builder;
pub mod constraint;
pub mod error;
pub mod math;
pub mod path;

pub use error::{Result, RoadkitError};
