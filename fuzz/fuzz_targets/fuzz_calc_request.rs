#![no_main]

use calculator::Service;
use calculator_gateway::api::rest::dto::CalcRequestDto;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    // Same path as a gateway request body: JSON -> DTO -> wire -> decode -> run
    if let Ok(req) = serde_json::from_slice::<CalcRequestDto>(data) {
        let commands = req.commands.into_iter().map(Into::into).collect();
        let _ = Service::default().evaluate(commands);
    }
});
