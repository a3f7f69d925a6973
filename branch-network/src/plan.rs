use crate::TopologyError;
use crate::network::ip::Ipv4Cidr;

/// Every branch gets a /29 point-to-point transit block carved from the WAN
/// supernet: two usable addresses out of eight, one per side of the hub link.
pub const WAN_SUBNET_PREFIX: u8 = 29;

/// Every branch gets a /24 LAN carved from the LAN base network.
pub const LAN_SUBNET_PREFIX: u8 = 24;

/// Immutable input of the address planner. Identical requests always produce
/// identical plans, so the generator can be re-run against a live topology and
/// reproduce the exact same addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanRequest {
    pub branches: u32,
    pub wan_supernet: Ipv4Cidr,
    pub lan_base: Ipv4Cidr,
}

impl PlanRequest {
    pub fn plan(&self) -> Result<AddressPlan, TopologyError> {
        if self.branches == 0 {
            return Err(TopologyError::InvalidTopologySize {
                branches: 0,
                reason: "at least one branch site is required".to_string(),
            });
        }

        let wan_block_size = 1u64 << (32 - WAN_SUBNET_PREFIX as u32);
        let available_blocks = self.wan_supernet.size() / wan_block_size;
        if self.branches as u64 > available_blocks {
            return Err(TopologyError::InvalidTopologySize {
                branches: self.branches,
                reason: format!(
                    "the WAN supernet {} holds only {available_blocks} /{WAN_SUBNET_PREFIX} transit blocks",
                    self.wan_supernet
                ),
            });
        }

        // Branch i's LAN is the (i+1)-th /24 of the base, so the base must
        // hold one block more than the branch count
        if self
            .lan_base
            .nth_subnet(LAN_SUBNET_PREFIX, self.branches as u64)
            .is_none()
        {
            return Err(TopologyError::InvalidTopologySize {
                branches: self.branches,
                reason: format!(
                    "the LAN base {} cannot hold {} /{LAN_SUBNET_PREFIX} subnets",
                    self.lan_base,
                    self.branches as u64 + 1
                ),
            });
        }

        let branches = (0..self.branches)
            .map(|index| self.branch_addressing(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AddressPlan {
            wan_supernet: self.wan_supernet,
            branches,
        })
    }

    fn branch_addressing(&self, index: u32) -> Result<BranchAddressing, TopologyError> {
        let wan_subnet = self
            .wan_supernet
            .nth_subnet(WAN_SUBNET_PREFIX, index as u64)
            .expect("block count validated against the supernet size");
        let branch_wan_ip = wan_subnet.first_host().expect("a /29 has usable hosts");
        let hub_wan_ip = wan_subnet.last_host().expect("a /29 has usable hosts");

        let lan_subnet = self
            .lan_base
            .nth_subnet(LAN_SUBNET_PREFIX, index as u64 + 1)
            .expect("block count validated against the lan base size");
        if lan_subnet.overlaps(&self.wan_supernet) {
            return Err(TopologyError::AddressConflict {
                address: lan_subnet.to_string(),
                first: format!("branch {index} lan subnet"),
                second: format!("wan supernet {}", self.wan_supernet),
            });
        }
        let router_lan_ip = lan_subnet.first_host().expect("a /24 has usable hosts");
        let host_lan_ip = lan_subnet.last_host().expect("a /24 has usable hosts");

        Ok(BranchAddressing {
            index,
            wan_subnet,
            hub_wan_ip,
            branch_wan_ip,
            lan_subnet,
            router_lan_ip,
            host_lan_ip,
        })
    }
}

/// The deterministic addressing of the whole network, ordered by branch index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPlan {
    pub wan_supernet: Ipv4Cidr,
    pub branches: Vec<BranchAddressing>,
}

impl AddressPlan {
    pub fn branch_count(&self) -> u32 {
        self.branches.len() as u32
    }

    pub fn branch(&self, index: u32) -> Result<&BranchAddressing, TopologyError> {
        self.branches
            .get(index as usize)
            .ok_or(TopologyError::UnreachableBranch {
                index,
                branches: self.branch_count(),
            })
    }
}

/// Addressing of a single branch site. Interface addresses keep the prefix of
/// the subnet they live in (`192.168.100.6/29` style).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchAddressing {
    pub index: u32,
    /// The /29 transit block linking this branch to the hub.
    pub wan_subnet: Ipv4Cidr,
    /// The hub's address on this branch's transit block (last usable).
    pub hub_wan_ip: Ipv4Cidr,
    /// The branch router's WAN address (first usable).
    pub branch_wan_ip: Ipv4Cidr,
    /// The branch's private /24.
    pub lan_subnet: Ipv4Cidr,
    /// The branch router's LAN gateway address (`.1`).
    pub router_lan_ip: Ipv4Cidr,
    /// The end station's address (`.254`).
    pub host_lan_ip: Ipv4Cidr,
}
