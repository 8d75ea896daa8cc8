use orrery::demos::grid;
use orrery::{Args, init_logging};

fn main() {
    let args = Args::parse();
    init_logging(args.logging());

    if let Err(e) = grid::run(args.apply(grid::config())) {
        log::error!("{e}");
        std::process::exit(e.exit_code());
    }
}
