use crate::network::ip::Ipv4Cidr;
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;

/// A static route entry: traffic towards `destination` is handed to
/// `next_hop`, which must be reachable through one of the owning router's
/// directly-connected subnets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub destination: Ipv4Cidr,
    pub next_hop: Ipv4Addr,
}

impl Route {
    pub fn new(destination: Ipv4Cidr, next_hop: Ipv4Addr) -> Self {
        Self {
            destination,
            next_hop,
        }
    }

    /// A default route (`0.0.0.0/0`) via `next_hop`.
    pub fn default_route(next_hop: Ipv4Addr) -> Self {
        Self {
            destination: Ipv4Cidr {
                address: Ipv4Addr::UNSPECIFIED,
                network_prefix: 0,
            },
            next_hop,
        }
    }

    pub fn is_default(&self) -> bool {
        self.destination.network_prefix() == 0
    }

    pub fn next_hop_towards(&self, ip: Ipv4Addr) -> Option<Ipv4Addr> {
        if self.destination.contains(ip) {
            Some(self.next_hop)
        } else {
            None
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_default() {
            write!(f, "default via {}", self.next_hop)
        } else {
            write!(f, "{} via {}", self.destination, self.next_hop)
        }
    }
}
