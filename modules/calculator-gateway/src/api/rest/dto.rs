use calculator_sdk::{CalcOutcome, Operand, VariableValue, WireCommand};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa::openapi::schema::{KnownFormat, ObjectBuilder, OneOfBuilder, Schema, SchemaFormat, Type};

/// A literal number or a variable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum OperandDto {
    Number(f64),
    Variable(String),
}

impl From<OperandDto> for Operand {
    fn from(dto: OperandDto) -> Self {
        match dto {
            OperandDto::Number(n) => Operand::Number(n),
            OperandDto::Variable(name) => Operand::Variable(name),
        }
    }
}

/// One command of a batch. `type` is `calc` or `print`.
///
/// A `calc` carries either `op`/`left`/`right` or a textual `expr`;
/// a `print` carries only `var`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
#[schema(example = json!({ "type": "calc", "var": "x", "op": "+", "left": 1, "right": "y" }))]
pub struct CommandDto {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<OperandDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<OperandDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
}

impl From<CommandDto> for WireCommand {
    fn from(dto: CommandDto) -> Self {
        Self {
            kind: dto.kind,
            var: dto.var,
            op: dto.op,
            left: dto.left.map(Into::into),
            right: dto.right.map(Into::into),
            expr: dto.expr,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CalcRequestDto {
    pub commands: Vec<CommandDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemDto {
    pub var: String,
    // Finite results are JSON numbers; overflow yields "inf", "-inf" or "NaN".
    #[serde(with = "ieee_number")]
    #[schema(schema_with = ieee_number::schema)]
    pub value: f64,
}

/// JSON has no literal for non-finite doubles, so they travel as fixed strings.
mod ieee_number {
    use super::{KnownFormat, ObjectBuilder, OneOfBuilder, Schema, SchemaFormat, Type};
    use serde::de::{Error, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    const INF: &str = "inf";
    const NEG_INF: &str = "-inf";
    const NAN: &str = "NaN";

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(super) fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            s.serialize_f64(*value)
        } else if value.is_nan() {
            s.serialize_str(NAN)
        } else if value.is_sign_positive() {
            s.serialize_str(INF)
        } else {
            s.serialize_str(NEG_INF)
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(d)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(t) => match t.as_str() {
                INF => Ok(f64::INFINITY),
                NEG_INF => Ok(f64::NEG_INFINITY),
                NAN => Ok(f64::NAN),
                other => Err(D::Error::invalid_value(
                    Unexpected::Str(other),
                    &"a number, \"inf\", \"-inf\" or \"NaN\"",
                )),
            },
        }
    }

    pub(super) fn schema() -> Schema {
        OneOfBuilder::new()
            .item(
                ObjectBuilder::new()
                    .schema_type(Type::Number)
                    .format(Some(SchemaFormat::KnownFormat(KnownFormat::Double))),
            )
            .item(
                ObjectBuilder::new()
                    .schema_type(Type::String)
                    .enum_values(Some([INF, NEG_INF, NAN])),
            )
            .description(Some("IEEE-754 result; non-finite values are spelled out"))
            .into()
    }
}

impl From<VariableValue> for ItemDto {
    fn from(v: VariableValue) -> Self {
        Self {
            var: v.name,
            value: v.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalcResponseDto {
    /// Printed variables in command order.
    pub items: Vec<ItemDto>,
    /// Evaluation time in microseconds.
    pub duration_us: u64,
}

impl From<CalcOutcome> for CalcResponseDto {
    fn from(outcome: CalcOutcome) -> Self {
        Self {
            items: outcome.items.into_iter().map(Into::into).collect(),
            duration_us: u64::try_from(outcome.duration.as_micros()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn request_body_maps_to_wire_commands() {
        let req: CalcRequestDto = serde_json::from_value(serde_json::json!({
            "commands": [
                { "type": "calc", "var": "x", "op": "+", "left": 1, "right": "y" },
                { "type": "calc", "var": "z", "expr": "x * (y - 1)" },
                { "type": "print", "var": "x" }
            ]
        }))
        .unwrap();

        let wire: Vec<WireCommand> = req.commands.into_iter().map(Into::into).collect();
        assert_eq!(
            wire,
            vec![
                WireCommand::calc_binary("x", "+", 1.0, "y"),
                WireCommand::calc_expr("z", "x * (y - 1)"),
                WireCommand::print("x"),
            ]
        );
    }

    #[test]
    fn unknown_command_fields_are_rejected() {
        let res = serde_json::from_value::<CommandDto>(serde_json::json!({
            "type": "print", "var": "x", "value": 3
        }));
        assert!(res.is_err());
    }

    #[test]
    fn kind_is_passed_through_verbatim() {
        let cmd: CommandDto =
            serde_json::from_value(serde_json::json!({ "type": "Print", "var": "x" })).unwrap();
        assert_eq!(WireCommand::from(cmd).kind, "Print");
    }

    #[test]
    fn response_renders_items_and_micros() {
        let dto = CalcResponseDto::from(CalcOutcome {
            items: vec![VariableValue::new("x", 3.0)],
            duration: Duration::from_micros(12),
        });
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            v,
            serde_json::json!({ "items": [{ "var": "x", "value": 3.0 }], "duration_us": 12 })
        );
    }

    #[test]
    fn non_finite_values_render_as_strings_and_parse_back() {
        let dto = CalcResponseDto::from(CalcOutcome {
            items: vec![
                VariableValue::new("a", f64::INFINITY),
                VariableValue::new("b", f64::NEG_INFINITY),
                VariableValue::new("c", f64::NAN),
            ],
            duration: Duration::ZERO,
        });
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            v["items"],
            serde_json::json!([
                { "var": "a", "value": "inf" },
                { "var": "b", "value": "-inf" },
                { "var": "c", "value": "NaN" }
            ])
        );

        let back: CalcResponseDto = serde_json::from_value(v).unwrap();
        assert_eq!(back.items[0].value, f64::INFINITY);
        assert_eq!(back.items[1].value, f64::NEG_INFINITY);
        assert!(back.items[2].value.is_nan());
    }

    #[test]
    fn unknown_value_string_is_rejected() {
        let res =
            serde_json::from_value::<ItemDto>(serde_json::json!({ "var": "x", "value": "big" }));
        assert!(res.is_err());
    }
}
