#![no_main]

use calculator::domain::evaluator::evaluate;
use calculator::domain::parser::parse_expression;
use calculator::domain::variables::VariableTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Limit input size to avoid OOM on pathological inputs
    if data.len() > 4096 {
        return;
    }
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(expr) = parse_expression(s, 64) {
            let mut table = VariableTable::new();
            table.set("x", 1.5);
            let _ = evaluate(&expr, &table);
        }
    }
});
