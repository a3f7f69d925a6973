use crate::adapter::{self, ScriptAdapter};
use crate::config::WorkbenchConfig;
use crate::json::{NetworkSpecJson, RouteTablesJson};
use anyhow::Context;
use branch_network::routes;
use branch_network::topology;

pub fn print_plan(config: &WorkbenchConfig) -> anyhow::Result<()> {
    let plan = config.request.plan()?;

    println!("--- Address plan ---");
    println!("* Branches: {}", plan.branch_count());
    println!("* WAN supernet: {}", plan.wan_supernet);
    println!("* LAN base: {}", config.request.lan_base);

    for branch in &plan.branches {
        println!("--- Branch {} ---", branch.index);
        println!("* WAN transit subnet: {}", branch.wan_subnet);
        println!("* Hub-side WAN address: {}", branch.hub_wan_ip);
        println!("* Branch-side WAN address: {}", branch.branch_wan_ip);
        println!("* LAN subnet: {}", branch.lan_subnet);
        println!("* Router LAN address: {}", branch.router_lan_ip);
        println!("* Host LAN address: {}", branch.host_lan_ip);
    }

    Ok(())
}

pub fn write_graph(config: &WorkbenchConfig) -> anyhow::Result<()> {
    let plan = config.request.plan()?;
    let graph = topology::build(&plan)?;

    serde_json::to_writer_pretty(std::io::stdout().lock(), &NetworkSpecJson::from(&graph))
        .context("failed to serialize the network graph")?;
    println!();

    Ok(())
}

pub fn print_routes(config: &WorkbenchConfig, json: bool) -> anyhow::Result<()> {
    let plan = config.request.plan()?;
    let tables = routes::synthesize(&plan, config.synthesis);

    if json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &RouteTablesJson::from(&tables))
            .context("failed to serialize the route tables")?;
        println!();
        return Ok(());
    }

    for (node, routes) in tables.iter() {
        println!("--- {node} ---");
        for route in routes {
            println!("ip route add {route}");
        }
    }

    Ok(())
}

pub fn write_script(config: &WorkbenchConfig) -> anyhow::Result<()> {
    let plan = config.request.plan()?;
    let graph = topology::build(&plan)?;
    let tables = routes::synthesize(&plan, config.synthesis);

    let mut script = ScriptAdapter::new(std::io::stdout().lock());
    adapter::realize(&graph, &mut script)?;
    adapter::install_routes(&tables, &mut script)?;

    Ok(())
}
