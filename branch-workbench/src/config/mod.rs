use crate::config::cli::CliOpt;
use branch_network::plan::PlanRequest;
use branch_network::routes::SynthesisOptions;

pub mod cli;

/// Fully resolved workbench configuration.
pub struct WorkbenchConfig {
    pub request: PlanRequest,
    pub synthesis: SynthesisOptions,
}

impl From<&CliOpt> for WorkbenchConfig {
    fn from(options: &CliOpt) -> Self {
        Self {
            request: PlanRequest {
                branches: options.branches,
                wan_supernet: options.wan_supernet,
                lan_base: options.lan_base,
            },
            synthesis: SynthesisOptions {
                wan_reachability: !options.no_wan_routes,
            },
        }
    }
}
