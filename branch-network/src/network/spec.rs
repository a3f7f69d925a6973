use crate::network::ip::Ipv4Cidr;

/// Abstract description of a synthesized network: the artifact handed to the
/// emulation adapter, and the thing tests inspect.
pub struct NetworkSpec {
    pub nodes: Vec<NetworkNodeSpec>,
    pub switches: Vec<NetworkSwitchSpec>,
    pub links: Vec<NetworkLinkSpec>,
}

impl NetworkSpec {
    pub fn node(&self, id: &str) -> Option<&NetworkNodeSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn switch(&self, id: &str) -> Option<&NetworkSwitchSpec> {
        self.switches.iter().find(|s| s.id == id)
    }

    pub fn routers(&self) -> impl Iterator<Item = &NetworkNodeSpec> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Router)
    }

    pub fn hosts(&self) -> impl Iterator<Item = &NetworkNodeSpec> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Host)
    }

    /// The configured interfaces of a node, in link-creation order.
    pub fn interfaces_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a InterfaceSpec> {
        self.links
            .iter()
            .filter(move |l| l.node == node_id)
            .filter_map(|l| l.interface.as_ref())
    }
}

pub struct NetworkNodeSpec {
    pub id: String,
    pub kind: NodeKind,
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Host,
    Router,
}

impl NodeKind {
    /// Routers keep IP forwarding enabled for their whole lifetime; the
    /// emulation adapter toggles it on bring-up and teardown.
    pub fn forwarding(self) -> bool {
        matches!(self, NodeKind::Router)
    }
}

/// A pure L2 forwarding element. It carries no addresses of its own, but it
/// belongs to exactly one subnet, which every connected interface must be
/// addressed in.
pub struct NetworkSwitchSpec {
    pub id: String,
    pub kind: SwitchKind,
    pub subnet: Ipv4Cidr,
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum SwitchKind {
    Wan,
    Lan,
}

/// A link between a node and a switch. The node endpoint optionally carries
/// the interface to configure there; switches never do.
pub struct NetworkLinkSpec {
    pub id: String,
    pub node: String,
    pub switch: String,
    pub interface: Option<InterfaceSpec>,
}

pub struct InterfaceSpec {
    pub name: String,
    pub address: Ipv4Cidr,
}
