use branch_network::network::ip::Ipv4Cidr;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
pub struct CliOpt {
    /// The number of branch sites to synthesize
    #[arg(long)]
    pub branches: u32,

    /// The WAN supernet from which the per-branch /29 transit blocks are
    /// carved
    #[arg(long, default_value = "192.168.100.0/24")]
    pub wan_supernet: Ipv4Cidr,

    /// The base network from which the per-branch /24 LAN subnets are carved
    /// (branch i gets the (i+1)-th block)
    #[arg(long, default_value = "10.0.0.0/16")]
    pub lan_base: Ipv4Cidr,

    /// Skip the branch-to-branch WAN transit routes. LAN-to-LAN reachability
    /// is unaffected, but branch routers can no longer reach each other's
    /// WAN-facing interfaces
    #[arg(long)]
    pub no_wan_routes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the address plan
    Plan,
    /// Emit the topology graph as JSON
    Graph,
    /// Print the static routes of every router and host
    Routes(RoutesOpt),
    /// Emit the ordered emulator script: nodes, switches, links, bring-up and
    /// route installation
    Script,
}

#[derive(Parser, Debug, Clone)]
pub struct RoutesOpt {
    /// Emit JSON instead of ip-route commands
    #[arg(long)]
    pub json: bool,
}
