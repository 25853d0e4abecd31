#![no_main]
use libfuzzer_sys::fuzz_target;
use pdf_syntax::parser::{parse_object_with, parse_object_attributes, ParseOptions};

fn harness(data: &[u8]) {
    let options = ParseOptions::tolerant();
    let mut buf = data;
    while let Ok((obj, rest)) = parse_object_with(buf, &options) {
        if let Ok(bytes) = obj.to_bytes() {
            let _ = parse_object_with(&bytes, &options);
        }
        if rest.len() >= buf.len() {
            break;
        }
        buf = rest;
    }
    let _ = parse_object_attributes(data);
}

fuzz_target!(|data: &[u8]| {
    harness(data);
});
