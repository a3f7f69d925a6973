use branch_network::network::ip::Ipv4Cidr;
use branch_network::network::spec::{
    InterfaceSpec, NetworkLinkSpec, NetworkNodeSpec, NetworkSpec, NetworkSwitchSpec, NodeKind,
    SwitchKind,
};
use branch_network::routes::RouteTables;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use std::net::Ipv4Addr;

#[derive(Serialize, Deserialize, Clone)]
pub struct NetworkSpecJson {
    nodes: Vec<NetworkNodeJson>,
    switches: Vec<NetworkSwitchJson>,
    links: Vec<NetworkLinkJson>,
}

#[derive(Serialize, Deserialize, Clone)]
struct NetworkNodeJson {
    id: String,
    #[serde(rename = "type")]
    kind: NodeKindJson,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
enum NodeKindJson {
    Router,
    Host,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone)]
struct NetworkSwitchJson {
    id: String,
    #[serde(rename = "type")]
    kind: SwitchKindJson,
    #[serde_as(as = "DisplayFromStr")]
    subnet: Ipv4Cidr,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
enum SwitchKindJson {
    Wan,
    Lan,
}

#[derive(Serialize, Deserialize, Clone)]
struct NetworkLinkJson {
    id: String,
    node: String,
    switch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interface: Option<InterfaceJson>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone)]
struct InterfaceJson {
    name: String,
    #[serde_as(as = "DisplayFromStr")]
    address: Ipv4Cidr,
}

impl From<&NetworkSpec> for NetworkSpecJson {
    fn from(spec: &NetworkSpec) -> Self {
        Self {
            nodes: spec
                .nodes
                .iter()
                .map(|n| NetworkNodeJson {
                    id: n.id.clone(),
                    kind: match n.kind {
                        NodeKind::Router => NodeKindJson::Router,
                        NodeKind::Host => NodeKindJson::Host,
                    },
                })
                .collect(),
            switches: spec
                .switches
                .iter()
                .map(|s| NetworkSwitchJson {
                    id: s.id.clone(),
                    kind: match s.kind {
                        SwitchKind::Wan => SwitchKindJson::Wan,
                        SwitchKind::Lan => SwitchKindJson::Lan,
                    },
                    subnet: s.subnet,
                })
                .collect(),
            links: spec
                .links
                .iter()
                .map(|l| NetworkLinkJson {
                    id: l.id.clone(),
                    node: l.node.clone(),
                    switch: l.switch.clone(),
                    interface: l.interface.as_ref().map(|i| InterfaceJson {
                        name: i.name.clone(),
                        address: i.address,
                    }),
                })
                .collect(),
        }
    }
}

impl From<NetworkSpecJson> for NetworkSpec {
    fn from(json: NetworkSpecJson) -> Self {
        Self {
            nodes: json
                .nodes
                .into_iter()
                .map(|n| NetworkNodeSpec {
                    id: n.id,
                    kind: match n.kind {
                        NodeKindJson::Router => NodeKind::Router,
                        NodeKindJson::Host => NodeKind::Host,
                    },
                })
                .collect(),
            switches: json
                .switches
                .into_iter()
                .map(|s| NetworkSwitchSpec {
                    id: s.id,
                    kind: match s.kind {
                        SwitchKindJson::Wan => SwitchKind::Wan,
                        SwitchKindJson::Lan => SwitchKind::Lan,
                    },
                    subnet: s.subnet,
                })
                .collect(),
            links: json
                .links
                .into_iter()
                .map(|l| NetworkLinkSpec {
                    id: l.id,
                    node: l.node,
                    switch: l.switch,
                    interface: l.interface.map(|i| InterfaceSpec {
                        name: i.name,
                        address: i.address,
                    }),
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct RouteTablesJson {
    tables: Vec<NodeRoutesJson>,
}

#[derive(Serialize, Deserialize, Clone)]
struct NodeRoutesJson {
    node: String,
    routes: Vec<RouteJson>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone)]
struct RouteJson {
    #[serde_as(as = "DisplayFromStr")]
    destination: Ipv4Cidr,
    via: Ipv4Addr,
}

impl From<&RouteTables> for RouteTablesJson {
    fn from(tables: &RouteTables) -> Self {
        Self {
            tables: tables
                .iter()
                .map(|(node, routes)| NodeRoutesJson {
                    node,
                    routes: routes
                        .iter()
                        .map(|r| RouteJson {
                            destination: r.destination,
                            via: r.next_hop,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use branch_network::plan::PlanRequest;
    use branch_network::routes::{SynthesisOptions, synthesize};
    use branch_network::topology;
    use std::str::FromStr;

    fn graph() -> NetworkSpec {
        let plan = PlanRequest {
            branches: 2,
            wan_supernet: Ipv4Cidr::from_str("192.168.100.0/24").unwrap(),
            lan_base: Ipv4Cidr::from_str("10.0.0.0/16").unwrap(),
        }
        .plan()
        .unwrap();
        topology::build(&plan).unwrap()
    }

    #[test]
    fn test_graph_round_trips_through_json() {
        let original = graph();

        let serialized = serde_json::to_string_pretty(&NetworkSpecJson::from(&original)).unwrap();
        let deserialized: NetworkSpecJson = serde_json::from_str(&serialized).unwrap();
        let restored = NetworkSpec::from(deserialized);

        assert_eq!(restored.nodes.len(), original.nodes.len());
        assert_eq!(restored.switches.len(), original.switches.len());
        assert_eq!(restored.links.len(), original.links.len());
        for (restored, original) in restored.links.iter().zip(&original.links) {
            assert_eq!(restored.id, original.id);
            let (restored, original) = (
                restored.interface.as_ref().unwrap(),
                original.interface.as_ref().unwrap(),
            );
            assert_eq!(restored.name, original.name);
            assert_eq!(restored.address, original.address);
        }
    }

    #[test]
    fn test_default_route_serialization() {
        let plan = PlanRequest {
            branches: 1,
            wan_supernet: Ipv4Cidr::from_str("192.168.100.0/24").unwrap(),
            lan_base: Ipv4Cidr::from_str("10.0.0.0/16").unwrap(),
        }
        .plan()
        .unwrap();
        let tables = synthesize(&plan, SynthesisOptions::default());

        let json = serde_json::to_value(RouteTablesJson::from(&tables)).unwrap();
        let host_routes = &json["tables"][2]["routes"];
        assert_eq!(host_routes[0]["destination"], "0.0.0.0/0");
        assert_eq!(host_routes[0]["via"], "10.0.1.1");
    }
}
