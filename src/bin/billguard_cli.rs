use billguard_core::cli;

fn main() {
    billguard_core::init();
    if let Err(err) = cli::run_cli() {
        cli::output::error(format!("fatal: {err}"));
        std::process::exit(1);
    }
}
