#![no_main]
use libfuzzer_sys::fuzz_target;
use oxi85::codec::decoder;

fuzz_target!(|data: &[u8]| {
    // Fuzz the decoder with arbitrary bytes.
    // The decoder must never panic, only return errors.
    let _ = decoder::decode_all(data);

    // Also fuzz with the header already in place so payload paths are reached.
    let mut framed = b"<~".to_vec();
    framed.extend_from_slice(data);
    let _ = decoder::decode_all(&framed);
});
