//! Hub-and-spoke branch network synthesis
//!
//! Carves a WAN supernet into per-branch point-to-point transit blocks,
//! assigns a private LAN per branch, derives the topology graph (hub router,
//! branch routers, switches, hosts) and computes the static routes every node
//! needs for full LAN-to-LAN reachability through the hub.
//!
//! All of it is pure: the same [`plan::PlanRequest`] always yields the same
//! plan, graph and route tables. Realizing the result on a live emulator is
//! the workbench binary's job.

pub mod naming;
pub mod network;
pub mod plan;
pub mod routes;
pub mod topology;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("cannot synthesize a topology with {branches} branch sites: {reason}")]
    InvalidTopologySize { branches: u32, reason: String },
    #[error("conflicting address assignment: `{address}` ({first}, {second})")]
    AddressConflict {
        address: String,
        first: String,
        second: String,
    },
    #[error("branch {index} is not part of the plan (it covers {branches} branches)")]
    UnreachableBranch { index: u32, branches: u32 },
}

#[cfg(test)]
mod test {
    use crate::network::ip::Ipv4Cidr;
    use crate::plan::{AddressPlan, PlanRequest};
    use crate::routes::{RouteTables, SynthesisOptions, synthesize};
    use crate::topology;
    use bon::builder;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    #[builder]
    fn default_plan(
        branches: Option<u32>,
        wan_supernet: Option<&str>,
        lan_base: Option<&str>,
    ) -> AddressPlan {
        let request = PlanRequest {
            branches: branches.unwrap_or(2),
            wan_supernet: Ipv4Cidr::from_str(wan_supernet.unwrap_or("192.168.100.0/24")).unwrap(),
            lan_base: Ipv4Cidr::from_str(lan_base.unwrap_or("10.0.0.0/16")).unwrap(),
        };
        request.plan().unwrap()
    }

    /// A node of the synthesized network, as seen by the forwarding walk.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum NodeRef {
        Hub,
        Router(u32),
        Host(u32),
    }

    fn connected_subnets(plan: &AddressPlan, node: NodeRef) -> Vec<Ipv4Cidr> {
        match node {
            NodeRef::Hub => plan.branches.iter().map(|b| b.wan_subnet).collect(),
            NodeRef::Router(i) => {
                let branch = &plan.branches[i as usize];
                vec![branch.wan_subnet, branch.lan_subnet]
            }
            NodeRef::Host(i) => vec![plan.branches[i as usize].lan_subnet],
        }
    }

    fn owner_of(plan: &AddressPlan, ip: Ipv4Addr) -> Option<NodeRef> {
        for branch in &plan.branches {
            if branch.hub_wan_ip.address() == ip {
                return Some(NodeRef::Hub);
            }
            if branch.branch_wan_ip.address() == ip || branch.router_lan_ip.address() == ip {
                return Some(NodeRef::Router(branch.index));
            }
            if branch.host_lan_ip.address() == ip {
                return Some(NodeRef::Host(branch.index));
            }
        }
        None
    }

    /// Walks the synthesized tables hop by hop, enforcing at every step that
    /// the chosen next hop is directly connected to the forwarding node.
    /// Returns the node owning the destination address.
    fn deliver(
        plan: &AddressPlan,
        tables: &RouteTables,
        from: NodeRef,
        destination: Ipv4Addr,
    ) -> NodeRef {
        let mut current = from;

        // Two-hop worst case (branch, hub, branch), plus the first hop out of
        // the host: anything longer means a forwarding loop
        for _ in 0..4 {
            if connected_subnets(plan, current)
                .iter()
                .any(|subnet| subnet.contains(destination))
            {
                return owner_of(plan, destination)
                    .unwrap_or_else(|| panic!("no node owns {destination}"));
            }

            let routes = match current {
                NodeRef::Hub => tables.hub(),
                NodeRef::Router(i) => tables.branch_router(i).unwrap(),
                NodeRef::Host(i) => tables.host(i).unwrap(),
            };
            let next_hop = routes
                .iter()
                .find_map(|route| route.next_hop_towards(destination))
                .unwrap_or_else(|| panic!("{current:?} has no route towards {destination}"));

            assert!(
                connected_subnets(plan, current)
                    .iter()
                    .any(|subnet| subnet.contains(next_hop)),
                "{current:?} chose next hop {next_hop}, which is not directly connected"
            );

            current = owner_of(plan, next_hop)
                .unwrap_or_else(|| panic!("next hop {next_hop} is not assigned to any node"));
        }

        panic!("packet from {from:?} to {destination} did not converge");
    }

    #[test]
    fn test_full_mesh_lan_reachability() {
        // The hardening WAN routes must not be load-bearing for LAN traffic
        for wan_reachability in [true, false] {
            let plan = default_plan().branches(4).call();
            let tables = synthesize(&plan, SynthesisOptions { wan_reachability });

            for source in &plan.branches {
                for target in &plan.branches {
                    if source.index == target.index {
                        continue;
                    }

                    let delivered = deliver(
                        &plan,
                        &tables,
                        NodeRef::Host(source.index),
                        target.host_lan_ip.address(),
                    );
                    assert_eq!(delivered, NodeRef::Host(target.index));
                }
            }
        }
    }

    #[test]
    fn test_branch_routers_reach_each_other_with_wan_routes() {
        let plan = default_plan().branches(3).call();
        let tables = synthesize(&plan, SynthesisOptions::default());

        for source in &plan.branches {
            for target in &plan.branches {
                if source.index == target.index {
                    continue;
                }

                let delivered = deliver(
                    &plan,
                    &tables,
                    NodeRef::Router(source.index),
                    target.branch_wan_ip.address(),
                );
                assert_eq!(delivered, NodeRef::Router(target.index));
            }
        }
    }

    #[test]
    fn test_plan_topology_and_routes_agree_on_nodes() {
        let plan = default_plan().branches(3).call();
        let graph = topology::build(&plan).unwrap();
        let tables = synthesize(&plan, SynthesisOptions::default());

        for (node, _) in tables.iter() {
            assert!(
                graph.node(&node).is_some(),
                "route table targets unknown node {node}"
            );
        }
    }

    #[test]
    fn test_custom_addressing_bases() {
        let plan = default_plan()
            .branches(2)
            .wan_supernet("172.16.0.0/24")
            .lan_base("192.168.0.0/16")
            .call();

        assert_eq!(plan.branches[0].branch_wan_ip.to_string(), "172.16.0.1/29");
        assert_eq!(plan.branches[1].lan_subnet.to_string(), "192.168.2.0/24");

        let tables = synthesize(&plan, SynthesisOptions::default());
        assert_eq!(tables.hub()[1].to_string(), "192.168.2.0/24 via 172.16.0.9");
    }
}
