#![no_main]

use attrsettings::{AttributeFactory, AttributeSettings, StringIdPool};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|text: &str| {
    let factory = AttributeFactory::with_builtin();
    let mut settings = AttributeSettings::new(Arc::new(StringIdPool::new()));
    let _ = settings.init_from_string(text, &factory);
});
