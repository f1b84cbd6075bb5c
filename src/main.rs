use cafeteria_sim::config::SimulationConfig;
use cafeteria_sim::{cafeteria, report};
use failure::Error;
use std::env;
use std::process;

fn run() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();

    let mut as_json = false;
    let mut config_path = None;

    for arg in args.iter().skip(1) {
        if arg == "--json" {
            as_json = true;
        } else {
            config_path = Some(arg.clone());
        }
    }

    let config = match config_path {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };

    let output = cafeteria::run(&config)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        report::print_report(&output);
    }

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(error) = run() {
        eprintln!("error: {}", error);

        process::exit(1);
    }
}
