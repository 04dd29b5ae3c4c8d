use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds only exist to run the unit tests of the portable core
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega328P
    println!("cargo:rustc-link-arg-bins=-mmcu=atmega328p");

    if env::var("CARGO_FEATURE_DEBUG").is_ok() {
        println!("cargo:warning=debug console on USART0 TX (PD1): switch column 1 is unusable");
    }
}
