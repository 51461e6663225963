#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Syntax detection, parsing and validation must not panic on any input.
    if let Ok(mut invoice) = einvoice::xml::parse(data) {
        let _ = einvoice::validate(&mut invoice);
        let mut out = Vec::new();
        let _ = einvoice::xml::write(&invoice, &mut out);
    }
});
