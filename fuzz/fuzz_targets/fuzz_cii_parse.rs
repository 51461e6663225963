#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(mut invoice) = einvoice::xml::from_cii_xml(s) {
            let _ = einvoice::validate(&mut invoice);
        }
    }
});
