use clap::{Arg, ArgAction, Command};
use log::{error, LevelFilter};
use pipecrack::app_logic;

fn main() {
    let matches = Command::new("pipecrack")
        .version("0.1.0")
        .about("Fatigue crack growth and inspection intervals for pressurised pipes")
        .arg(
            Arg::new("run")
                .short('r')
                .long("run")
                .help("Run the analysis described by a YAML or TOML configuration file")
                .required(true)
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log quadrature and sampling details")
                .action(ArgAction::SetTrue)
        )
        .after_help("The report is written to stdout as JSON or CSV, as chosen by \
                     solution.output in the configuration.")
        .get_matches();

    let log_level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::builder().filter_level(log_level).init();

    if let Some(r) = matches.get_one::<String>("run") {
        if let Err(err) = app_logic::run(r) {
            error!("{:#}", err);
            std::process::exit(1);
        }
    }
}
