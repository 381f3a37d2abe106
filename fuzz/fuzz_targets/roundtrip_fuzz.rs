#![no_main]
use libfuzzer_sys::fuzz_target;
use oxi85::codec::encoder::Ascii85Encoder;
use oxi85::codec::{decoder, encoder};

fuzz_target!(|data: &[u8]| {
    let encoded = encoder::encode_all(data);
    let decoded = decoder::decode_all(&encoded).unwrap();
    assert_eq!(decoded, data);

    // Chunked streaming must produce the same text as the one-shot encoder.
    if let Some((&split, rest)) = data.split_first() {
        let chunk = split as usize % 7 + 1;
        let mut streamed = Vec::new();
        let mut enc = Ascii85Encoder::new(&mut streamed);
        for piece in rest.chunks(chunk) {
            enc.write_data(piece).unwrap();
        }
        enc.finish().unwrap();
        assert_eq!(streamed, encoder::encode_all(rest));
    }
});
