#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parser must not panic on any input; unrecognized statuses are
    // typed errors, never panics.
    let _ = covgate::mutation::xml::parse(data);
});
