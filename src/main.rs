//! rPickup main entrypoint.

use rpickup::run;

fn main() {
    rpickup::init_tracing();

    println!();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
