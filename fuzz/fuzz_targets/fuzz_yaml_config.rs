#![no_main]

use calc_bootstrap::{AppConfig, module_config_or_default};
use calculator::CalculatorConfig;
use calculator_gateway::GatewayConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = serde_yaml::from_str::<AppConfig>(s) {
            let _ = module_config_or_default::<CalculatorConfig>(&config, calculator::MODULE_NAME);
            let _ = module_config_or_default::<GatewayConfig>(
                &config,
                calculator_gateway::MODULE_NAME,
            );
        }
    }
});
