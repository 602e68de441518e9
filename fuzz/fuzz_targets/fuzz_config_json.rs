//! Fuzz target: `SorterConfig` JSON parsing and validation
//!
//! Feeds arbitrary bytes to `serde_json` and, when they parse, checks that
//! `SortController::new` accepts exactly the configs `validate()` accepts.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use heightsort::app::service::SortController;
use heightsort::config::SorterConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<SorterConfig>(data) else {
        return;
    };
    let valid = config.validate().is_ok();
    assert_eq!(SortController::new(config).is_ok(), valid);
});
