#![no_main]

use indicator::config::IndicatorConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either parse or be rejected, never panic
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = serde_json::from_str::<IndicatorConfig>(s) {
            // Clamping must hold for whatever interval the file carries
            let interval = config.preferences.poll_interval();
            assert!(interval.as_millis() >= 10 && interval.as_millis() <= 1000);
        }
    }
});
