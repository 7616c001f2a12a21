use clap::Parser;
use std::io;
use yam_cli::cli::YamCli;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    // usage errors are reported by run; logging just stays at its default
    let verbose = YamCli::try_parse_from(&args).is_ok_and(|cli| cli.verbose);
    if let Err(e) = yam_cli::logging::init_logging(verbose) {
        eprintln!("WARNING: logging disabled: {}", e);
    }
    let code = yam_cli::run(args, &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
