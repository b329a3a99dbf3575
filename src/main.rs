use clap::Parser;
use orgenda::cli::commands::Cli;
use orgenda::cli::handlers;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let cli = Cli::parse();

    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    // A second logger is the only failure case; nothing to do about it
    let _ = TermLogger::init(
        level_for(cli.verbose),
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
