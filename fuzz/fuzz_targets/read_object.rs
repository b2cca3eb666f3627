#![no_main]
use libfuzzer_sys::fuzz_target;
use mgh::MghObject;

fuzz_target!(|data: &[u8]| {
    if let Ok(obj) = MghObject::from_reader(data) {
        let mut out = Vec::new();
        let _ = obj.to_writer(&mut out);
    }
});
