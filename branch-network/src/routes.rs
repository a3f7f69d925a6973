use crate::TopologyError;
use crate::naming;
use crate::network::route::Route;
use crate::plan::{AddressPlan, BranchAddressing};

/// Knobs of the route synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Also install, on every branch router, a route to every other branch's
    /// WAN transit block. LAN-to-LAN traffic does not need it (the LAN routes
    /// cover that), but without it branch routers cannot reach each other's
    /// WAN-facing interfaces.
    pub wan_reachability: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            wan_reachability: true,
        }
    }
}

/// Per-node static route tables, ordered the way they should be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTables {
    hub: Vec<Route>,
    branch_routers: Vec<Vec<Route>>,
    hosts: Vec<Vec<Route>>,
}

/// Computes every route table the topology needs for full reachability.
///
/// Hub-and-spoke, two-hop worst case: the hub knows every branch LAN through
/// the matching branch-side WAN address, each branch router sends everything
/// destined to other branches to the hub's address on its own transit block,
/// and hosts have a single default route towards their branch router.
pub fn synthesize(plan: &AddressPlan, options: SynthesisOptions) -> RouteTables {
    RouteTables {
        hub: hub_routes(plan),
        branch_routers: plan
            .branches
            .iter()
            .map(|branch| branch_router_routes(plan, branch, options))
            .collect(),
        hosts: plan.branches.iter().map(host_routes).collect(),
    }
}

fn hub_routes(plan: &AddressPlan) -> Vec<Route> {
    // The transit blocks themselves are directly connected to the hub, so the
    // branch LANs are the only destinations it needs entries for
    plan.branches
        .iter()
        .map(|branch| Route::new(branch.lan_subnet, branch.branch_wan_ip.address()))
        .collect()
}

fn branch_router_routes(
    plan: &AddressPlan,
    branch: &BranchAddressing,
    options: SynthesisOptions,
) -> Vec<Route> {
    // Everything towards other branches transits the hub via this branch's
    // own WAN link; own LAN and own transit block are directly connected
    let next_hop = branch.hub_wan_ip.address();

    let mut routes = Vec::new();
    for other in plan.branches.iter().filter(|o| o.index != branch.index) {
        routes.push(Route::new(other.lan_subnet, next_hop));
        if options.wan_reachability {
            routes.push(Route::new(other.wan_subnet, next_hop));
        }
    }
    routes
}

fn host_routes(branch: &BranchAddressing) -> Vec<Route> {
    vec![Route::default_route(branch.router_lan_ip.address())]
}

impl RouteTables {
    pub fn hub(&self) -> &[Route] {
        &self.hub
    }

    pub fn branch_router(&self, index: u32) -> Result<&[Route], TopologyError> {
        self.branch_routers
            .get(index as usize)
            .map(Vec::as_slice)
            .ok_or(self.unreachable(index))
    }

    pub fn host(&self, index: u32) -> Result<&[Route], TopologyError> {
        self.hosts
            .get(index as usize)
            .map(Vec::as_slice)
            .ok_or(self.unreachable(index))
    }

    /// Every table in installation order, keyed by the node ids the topology
    /// builder assigns.
    pub fn iter(&self) -> impl Iterator<Item = (String, &[Route])> {
        std::iter::once((naming::HUB.to_string(), self.hub.as_slice()))
            .chain(
                self.branch_routers
                    .iter()
                    .enumerate()
                    .map(|(i, routes)| (naming::branch_router(i as u32), routes.as_slice())),
            )
            .chain(
                self.hosts
                    .iter()
                    .enumerate()
                    .map(|(i, routes)| (naming::host(i as u32), routes.as_slice())),
            )
    }

    fn unreachable(&self, index: u32) -> TopologyError {
        TopologyError::UnreachableBranch {
            index,
            branches: self.branch_routers.len() as u32,
        }
    }
}
