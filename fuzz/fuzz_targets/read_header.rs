#![no_main]
use libfuzzer_sys::fuzz_target;
use mgh::MghHeader;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = MghHeader::from_reader(data) {
        let _ = header.dim();
        let _ = header.data_type();
        let _ = header.payload_size();
        let _ = header.scan_parameters();
        if let Ok(descriptor) = header.to_descriptor() {
            let _ = descriptor.orientation_label();
            let _ = MghHeader::from_descriptor(&descriptor);
        }
    }
});
