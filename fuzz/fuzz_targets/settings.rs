#![no_main]

use attrsettings::{AttributeFactory, AttributeSettings, CodecConfig, MemoryStream, StringIdPool};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let factory = AttributeFactory::with_builtin();
    let mut settings = AttributeSettings::new(Arc::new(StringIdPool::new()));
    let mut stream = MemoryStream::from_bytes(data.to_vec());
    if settings
        .read_with(&mut stream, &factory, &CodecConfig::strict())
        .is_ok()
    {
        let size = settings.calc_stream_size_for_version(data[0]).ok();
        assert_eq!(size, Some(stream.position()));
    }
});
