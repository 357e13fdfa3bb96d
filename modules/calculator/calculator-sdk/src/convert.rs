//! Conversions between proto messages and SDK models.

use std::time::Duration;

use crate::models::{CalcOutcome, Operand, VariableValue, WireCommand};
use crate::proto;

impl From<proto::operand::Kind> for Operand {
    fn from(kind: proto::operand::Kind) -> Self {
        match kind {
            proto::operand::Kind::Number(n) => Self::Number(n),
            proto::operand::Kind::Variable(name) => Self::Variable(name),
        }
    }
}

impl From<Operand> for proto::Operand {
    fn from(operand: Operand) -> Self {
        let kind = match operand {
            Operand::Number(n) => proto::operand::Kind::Number(n),
            Operand::Variable(name) => proto::operand::Kind::Variable(name),
        };
        Self { kind: Some(kind) }
    }
}

// An `Operand` message without `kind` counts as an absent operand.
impl From<proto::Command> for WireCommand {
    fn from(cmd: proto::Command) -> Self {
        Self {
            kind: cmd.r#type,
            var: cmd.var,
            op: cmd.op,
            left: cmd.left.and_then(|o| o.kind).map(Operand::from),
            right: cmd.right.and_then(|o| o.kind).map(Operand::from),
            expr: cmd.expr,
        }
    }
}

impl From<WireCommand> for proto::Command {
    fn from(cmd: WireCommand) -> Self {
        Self {
            r#type: cmd.kind,
            var: cmd.var,
            op: cmd.op,
            left: cmd.left.map(proto::Operand::from),
            right: cmd.right.map(proto::Operand::from),
            expr: cmd.expr,
        }
    }
}

impl From<VariableValue> for proto::calc_response::Item {
    fn from(v: VariableValue) -> Self {
        Self {
            var: v.name,
            value: v.value,
        }
    }
}

impl From<proto::calc_response::Item> for VariableValue {
    fn from(item: proto::calc_response::Item) -> Self {
        Self {
            name: item.var,
            value: item.value,
        }
    }
}

impl From<CalcOutcome> for proto::CalcResponse {
    fn from(outcome: CalcOutcome) -> Self {
        Self {
            items: outcome.items.into_iter().map(Into::into).collect(),
            duration_us: i64::try_from(outcome.duration.as_micros()).unwrap_or(i64::MAX),
        }
    }
}

impl From<proto::CalcResponse> for CalcOutcome {
    fn from(resp: proto::CalcResponse) -> Self {
        Self {
            items: resp.items.into_iter().map(Into::into).collect(),
            duration: Duration::from_micros(u64::try_from(resp.duration_us).unwrap_or(0)),
        }
    }
}
