use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = tusk::cli::run() {
        tusk::ui::print_error(&e);
        if e.shows_generic_help() {
            println!();
            tusk::cli::print_generic_help();
        }
        process::exit(e.exit_code());
    }
}
