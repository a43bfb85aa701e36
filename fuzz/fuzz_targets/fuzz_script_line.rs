#![no_main]

use indicator::platform::MemoryPlatform;
use indicator::shell::ScriptCommand;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    // Accepted commands must also apply cleanly to a fresh platform
    if let Ok(Some(command)) = ScriptCommand::parse(line, 1) {
        let (platform, _events) = MemoryPlatform::new();
        let _event = command.apply(&platform);
    }
});
