use crate::TopologyError;
use crate::naming;
use crate::network::ip::Ipv4Cidr;
use crate::network::spec::{
    InterfaceSpec, NetworkLinkSpec, NetworkNodeSpec, NetworkSpec, NetworkSwitchSpec, NodeKind,
    SwitchKind,
};
use crate::plan::AddressPlan;
use std::collections::HashMap;
use std::net::Ipv4Addr;

/// Builds the abstract hub-and-spoke graph for an address plan: one hub
/// router, and per branch a WAN switch, a branch router, a LAN switch and a
/// host, wired with four links carrying the planned interface addresses.
pub fn build(plan: &AddressPlan) -> Result<NetworkSpec, TopologyError> {
    let mut nodes = vec![NetworkNodeSpec {
        id: naming::HUB.to_string(),
        kind: NodeKind::Router,
    }];
    let mut switches = Vec::new();
    let mut links = Vec::new();

    for branch in &plan.branches {
        let index = branch.index;
        let wan_switch = naming::wan_switch(index);
        let lan_switch = naming::lan_switch(index);
        let router = naming::branch_router(index);
        let host = naming::host(index);

        switches.push(NetworkSwitchSpec {
            id: wan_switch.clone(),
            kind: SwitchKind::Wan,
            subnet: branch.wan_subnet,
        });
        switches.push(NetworkSwitchSpec {
            id: lan_switch.clone(),
            kind: SwitchKind::Lan,
            subnet: branch.lan_subnet,
        });
        nodes.push(NetworkNodeSpec {
            id: router.clone(),
            kind: NodeKind::Router,
        });
        nodes.push(NetworkNodeSpec {
            id: host.clone(),
            kind: NodeKind::Host,
        });

        links.push(link(
            naming::HUB,
            &wan_switch,
            naming::hub_wan_interface(index),
            branch.hub_wan_ip,
        ));
        links.push(link(
            &router,
            &wan_switch,
            naming::branch_wan_interface(index),
            branch.branch_wan_ip,
        ));
        links.push(link(
            &router,
            &lan_switch,
            naming::branch_lan_interface(index),
            branch.router_lan_ip,
        ));
        links.push(link(
            &host,
            &lan_switch,
            naming::host_interface(index),
            branch.host_lan_ip,
        ));
    }

    let spec = NetworkSpec {
        nodes,
        switches,
        links,
    };
    verify_addressing(&spec)?;
    Ok(spec)
}

fn link(node: &str, switch: &str, interface: String, address: Ipv4Cidr) -> NetworkLinkSpec {
    NetworkLinkSpec {
        id: format!("{node}-{switch}"),
        node: node.to_string(),
        switch: switch.to_string(),
        interface: Some(InterfaceSpec {
            name: interface,
            address,
        }),
    }
}

/// Unreachable given a correct planner: no two interfaces in the graph may
/// share an address, and every interface must be addressed inside the subnet
/// of the switch it connects to.
fn verify_addressing(spec: &NetworkSpec) -> Result<(), TopologyError> {
    let mut owners: HashMap<Ipv4Addr, &str> = HashMap::new();

    for link in &spec.links {
        let Some(interface) = &link.interface else {
            continue;
        };

        let address = interface.address.address();
        if let Some(previous) = owners.insert(address, interface.name.as_str()) {
            return Err(TopologyError::AddressConflict {
                address: address.to_string(),
                first: format!("interface {previous}"),
                second: format!("interface {}", interface.name),
            });
        }

        let switch = spec
            .switch(&link.switch)
            .expect("links reference switches created by the builder");
        if !switch.subnet.contains(address) {
            return Err(TopologyError::AddressConflict {
                address: interface.address.to_string(),
                first: format!("interface {}", interface.name),
                second: format!("outside switch {} subnet {}", switch.id, switch.subnet),
            });
        }
    }

    Ok(())
}
