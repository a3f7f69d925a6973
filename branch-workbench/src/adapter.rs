use anyhow::Context;
use branch_network::network::spec::{InterfaceSpec, NetworkSpec};
use branch_network::routes::RouteTables;
use std::io::Write;
use tracing::debug;

/// The boundary exposed by the external network emulator. The core never
/// talks to it directly; the workbench walks the synthesized artifacts and
/// replays them through whichever implementation is plugged in.
pub trait EmulatorAdapter {
    fn add_node(&mut self, id: &str, forwarding: bool) -> anyhow::Result<()>;
    fn add_switch(&mut self, id: &str) -> anyhow::Result<()>;
    fn add_link(
        &mut self,
        node: &str,
        switch: &str,
        interface: Option<&InterfaceSpec>,
    ) -> anyhow::Result<()>;
    fn network_up(&mut self) -> anyhow::Result<()>;
    fn exec(&mut self, node: &str, command: &str) -> anyhow::Result<()>;
    /// Lifecycle counterpart of [`EmulatorAdapter::network_up`]: forwarding
    /// is a per-node capability for the node's lifetime, so teardown resets
    /// it on every router.
    fn teardown(&mut self) -> anyhow::Result<()>;
}

/// Replays the graph against the adapter as an ordered creation script.
pub fn realize<A: EmulatorAdapter>(spec: &NetworkSpec, adapter: &mut A) -> anyhow::Result<()> {
    for node in &spec.nodes {
        debug!(node = %node.id, forwarding = node.kind.forwarding(), "creating node");
        adapter.add_node(&node.id, node.kind.forwarding())?;
    }

    for switch in &spec.switches {
        debug!(switch = %switch.id, subnet = %switch.subnet, "creating switch");
        adapter.add_switch(&switch.id)?;
    }

    for link in &spec.links {
        debug!(link = %link.id, "creating link");
        adapter.add_link(&link.node, &link.switch, link.interface.as_ref())?;
    }

    adapter.network_up()
}

/// Installs every synthesized route table, in table order, through the
/// adapter's shell-execute primitive. Re-applying the same tables is safe as
/// long as the adapter honors route-replace semantics.
pub fn install_routes<A: EmulatorAdapter>(
    tables: &RouteTables,
    adapter: &mut A,
) -> anyhow::Result<()> {
    for (node, routes) in tables.iter() {
        debug!(node = %node, routes = routes.len(), "installing routes");
        for route in routes {
            adapter.exec(&node, &format!("ip route add {route}"))?;
        }
    }

    Ok(())
}

/// Renders the adapter calls as an ordered command script, one line per
/// operation, for inspection or for feeding an external driver.
pub struct ScriptAdapter<W> {
    out: W,
    forwarding_nodes: Vec<String>,
}

impl<W: Write> ScriptAdapter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            forwarding_nodes: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EmulatorAdapter for ScriptAdapter<W> {
    fn add_node(&mut self, id: &str, forwarding: bool) -> anyhow::Result<()> {
        let written = if forwarding {
            self.forwarding_nodes.push(id.to_string());
            writeln!(self.out, "add-node {id} forwarding")
        } else {
            writeln!(self.out, "add-node {id}")
        };
        written.context("failed to write script")
    }

    fn add_switch(&mut self, id: &str) -> anyhow::Result<()> {
        writeln!(self.out, "add-switch {id}").context("failed to write script")
    }

    fn add_link(
        &mut self,
        node: &str,
        switch: &str,
        interface: Option<&InterfaceSpec>,
    ) -> anyhow::Result<()> {
        let written = match interface {
            Some(interface) => writeln!(
                self.out,
                "add-link {node} {switch} {} {}",
                interface.name, interface.address
            ),
            None => writeln!(self.out, "add-link {node} {switch}"),
        };
        written.context("failed to write script")
    }

    fn network_up(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "network-up").context("failed to write script")?;

        // Routers forward for their whole lifetime, starting at bring-up
        for node in &self.forwarding_nodes {
            writeln!(self.out, "exec {node} sysctl net.ipv4.ip_forward=1")
                .context("failed to write script")?;
        }

        Ok(())
    }

    fn exec(&mut self, node: &str, command: &str) -> anyhow::Result<()> {
        writeln!(self.out, "exec {node} {command}").context("failed to write script")
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        for node in &self.forwarding_nodes {
            writeln!(self.out, "exec {node} sysctl net.ipv4.ip_forward=0")
                .context("failed to write script")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use branch_network::network::ip::Ipv4Cidr;
    use branch_network::plan::PlanRequest;
    use branch_network::routes::{SynthesisOptions, synthesize};
    use branch_network::topology;
    use std::str::FromStr;

    fn script(branches: u32, teardown: bool) -> String {
        let plan = PlanRequest {
            branches,
            wan_supernet: Ipv4Cidr::from_str("192.168.100.0/24").unwrap(),
            lan_base: Ipv4Cidr::from_str("10.0.0.0/16").unwrap(),
        }
        .plan()
        .unwrap();
        let graph = topology::build(&plan).unwrap();
        let tables = synthesize(&plan, SynthesisOptions::default());

        let mut adapter = ScriptAdapter::new(Vec::new());
        realize(&graph, &mut adapter).unwrap();
        install_routes(&tables, &mut adapter).unwrap();
        if teardown {
            adapter.teardown().unwrap();
        }

        String::from_utf8(adapter.into_inner()).unwrap()
    }

    #[test]
    fn test_single_branch_script() {
        let expected = "\
add-node r0 forwarding
add-node r1 forwarding
add-node h1
add-switch ws1
add-switch ls1
add-link r0 ws1 r0-eth0 192.168.100.6/29
add-link r1 ws1 r1-eth0 192.168.100.1/29
add-link r1 ls1 r1-eth1 10.0.1.1/24
add-link h1 ls1 h1-eth0 10.0.1.254/24
network-up
exec r0 sysctl net.ipv4.ip_forward=1
exec r1 sysctl net.ipv4.ip_forward=1
exec r0 ip route add 10.0.1.0/24 via 192.168.100.1
exec h1 ip route add default via 10.0.1.1
";

        assert_eq!(script(1, false), expected);
    }

    #[test]
    fn test_teardown_resets_forwarding() {
        let script = script(2, true);

        let resets: Vec<_> = script
            .lines()
            .filter(|l| l.ends_with("sysctl net.ipv4.ip_forward=0"))
            .collect();
        assert_eq!(
            resets,
            [
                "exec r0 sysctl net.ipv4.ip_forward=0",
                "exec r1 sysctl net.ipv4.ip_forward=0",
                "exec r2 sysctl net.ipv4.ip_forward=0",
            ]
        );
    }
}
