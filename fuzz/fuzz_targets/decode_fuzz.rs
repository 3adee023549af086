//! Decode fuzz target: feed arbitrary input to the JSON, text-format and binary decoders.
//! Decoding must not panic; it returns a validated Config or a ModelError.
//! Build with: cargo fuzz run decode_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
use otgmodel::{Config, ObjectNode};

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let _ = Config::from_proto(data);
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let _ = Config::from_json(s);
    let _ = Config::from_pbtext(s);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run decode_fuzz");
}
