use orrery::demos::spheres;
use orrery::{Args, init_logging};

fn main() {
    let args = Args::parse();
    init_logging(args.logging());

    if let Err(e) = spheres::run(args.apply(spheres::config())) {
        log::error!("{e}");
        std::process::exit(e.exit_code());
    }
}
