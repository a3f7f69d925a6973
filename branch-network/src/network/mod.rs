//! Network-level value types shared by the planner, the topology builder and
//! the route synthesizer.

pub mod ip;
pub mod route;
pub mod spec;
