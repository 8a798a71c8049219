#![no_main]

use libfuzzer_sys::fuzz_target;
use td_authorizer::AuthorizationPhase;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let tag = value
        .get("@type")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned);
    if let Ok(phase) = AuthorizationPhase::from_json(value) {
        // A decoded phase reports the tag it was decoded from
        assert_eq!(Some(phase.tag()), tag.as_deref());
    }
});
