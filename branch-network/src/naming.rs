//! Node, switch and interface naming conventions.
//!
//! The topology builder and the route synthesizer consume the address plan
//! independently; keeping the naming in one place guarantees that the route
//! tables line up with the nodes the builder creates.

/// The central router every inter-branch packet transits.
pub const HUB: &str = "r0";

pub fn branch_router(index: u32) -> String {
    format!("r{}", index + 1)
}

pub fn host(index: u32) -> String {
    format!("h{}", index + 1)
}

pub fn wan_switch(index: u32) -> String {
    format!("ws{}", index + 1)
}

pub fn lan_switch(index: u32) -> String {
    format!("ls{}", index + 1)
}

/// The hub-side interface facing branch `index`.
pub fn hub_wan_interface(index: u32) -> String {
    format!("{HUB}-eth{index}")
}

pub fn branch_wan_interface(index: u32) -> String {
    format!("r{}-eth0", index + 1)
}

pub fn branch_lan_interface(index: u32) -> String {
    format!("r{}-eth1", index + 1)
}

pub fn host_interface(index: u32) -> String {
    format!("h{}-eth0", index + 1)
}
