#![no_main]

use codec::{decode_datagram, decode_datagram_prefix, Limits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = Limits::for_testing();

    let Ok(datagram) = decode_datagram(data, &limits) else {
        return;
    };

    // Anything that decodes must re-encode, and the re-encoded bytes must be
    // a fixed point. Bytes are compared since NaN counters never compare equal.
    let bytes = datagram.encode().expect("decoded datagram re-encodes");
    let (again, consumed) =
        decode_datagram_prefix(&bytes, &Limits::unlimited()).expect("re-encoded datagram decodes");
    assert_eq!(consumed, bytes.len());
    assert_eq!(again.samples.len(), datagram.samples.len());
    assert_eq!(again.encode().expect("second encode"), bytes);
});
