#![no_main]

use libfuzzer_sys::fuzz_target;
use number_field::{FloatDomain, FloatField, IntegerDomain, IntegerField, NumericDomain};

fn check_domain<D: NumericDomain>(text: &str) {
    // Whatever parses must format back to text that parses to the same value.
    if let Some(value) = D::parse(text) {
        let formatted = D::format(value);
        assert_eq!(D::parse(&formatted), Some(value), "{text:?} -> {formatted:?}");
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    check_domain::<FloatDomain>(text);
    check_domain::<IntegerDomain>(text);

    // Remote text never panics the engine, and the reported value is
    // always absent while the text is unparsable.
    let float = FloatField::new(1);
    float.sync_from_remote(text);
    assert!(!(float.is_unparsable() && float.value().is_some()));

    let integer = IntegerField::new(2);
    let _ = integer.set_step(3);
    integer.sync_from_remote(text);
    assert!(!(integer.is_unparsable() && integer.value().is_some()));
});
