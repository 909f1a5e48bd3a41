use hardhat_core::HardhatError;
use hardhat_core::cli::ArgumentsParser;
use hardhat_core::params::param_name_to_env_variable;
use std::collections::HashMap;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let env_variables: HashMap<String, String> = std::env::vars().collect();

    // Initialize logging
    let verbose = global_flag_set(&argv, &env_variables, "verbose");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "hardhat_core=debug"
        } else {
            "hardhat_core=warn"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("Error: could not read the current directory: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(err) = hardhat_core::run_cli(&argv, &env_variables, &cwd).await {
        error!("Command failed: {:#}", err);
        print_error(&err, global_flag_set(&argv, &env_variables, "showStackTraces"));
        std::process::exit(1);
    }

    debug!("Command finished");
}

// Flags are read before parsing so logging and error output can be set up
// even when parsing itself fails
fn global_flag_set(argv: &[String], env_variables: &HashMap<String, String>, name: &str) -> bool {
    let cla = ArgumentsParser::param_name_to_cla(name);
    argv.iter().any(|arg| *arg == cla)
        || env_variables
            .get(&param_name_to_env_variable(name))
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

fn print_error(err: &anyhow::Error, show_stack_traces: bool) {
    match err.downcast_ref::<HardhatError>() {
        Some(hardhat_error) => eprintln!("Error {}", hardhat_error),
        None => eprintln!("An unexpected error occurred: {}", err),
    }

    if !show_stack_traces {
        eprintln!("\nFor more info run hardhat with --show-stack-traces");
        return;
    }

    for cause in err.chain().skip(1) {
        eprintln!("Caused by: {}", cause);
    }
}
