use axil::blocks::slave::AxiLiteSlave;
use axil::common::config::*;
use axil::common::errors::*;
use axil::common::utils::write_string_to_file;
use axil::sim::driver::test_axil_bridge;
use axil::sim::scenarios::run_scenarios;
use axil::sim::simif::Sim;
use axil::toplevels;
use clap::Parser;
use log::{error, info, LevelFilter};
use std::path::Path;

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if args.print_version {
        println!("{}", toplevels::name_and_ver(args.top));
        return Ok(());
    }

    let entity = toplevels::describe(args.top);
    info!("top-level {} with {} ports", entity.name, entity.ports.len());

    match &args.ports {
        Some(file) => {
            write_string_to_file(entity.to_json()?, file)?;
            info!("wrote port description to {}", file);
        }
        None => {}
    }

    match &args.trace_dir {
        Some(dir) => {
            for path in run_scenarios(Path::new(dir), args.max_cycles)? {
                println!("{}", path.display());
            }
        }
        None => {}
    }

    if args.stress_iterations > 0 {
        let cfg = args.bus_config()?;
        let slave = AxiLiteSlave::new(cfg)?;
        let mut sim = Sim::new(slave).with_max_cycles(args.max_cycles);
        sim.reset(2);

        let mut rng = rand::thread_rng();
        let report = test_axil_bridge(&mut sim, args.stress_iterations, &mut rng, true)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
