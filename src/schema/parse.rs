//! JSON schema front-end: interpreting a JSON document as the shorthand
//! union.
//!
//! Branch precedence, in order: a JSON string is a type name; a JSON array
//! is the one-element sequence shorthand (empty means a bare array rule); a
//! JSON object is a key mapping unless every key is a rule keyword, in
//! which case it reads as a full rule. An empty object is a mapping with
//! zero declared keys. A mapping whose keys all collide with rule keywords
//! therefore reads as a rule; such a shape needs a full rule with a nested
//! "schema" mapping instead.
//!
//! Custom validator chains are not expressible in JSON; attach them through
//! the [`Rule`] builder.

use serde_json::Value as Json;

use crate::errors::{SchemaError, SchemaResult, Stage};
use crate::schema::types::{DefaultSource, Kind, Rule, Schema, UnknownKeys};
use crate::value::Value;

/// Every key that may appear in the rule form of a JSON schema object.
const RULE_KEYWORDS: [&str; 15] = [
    "type",
    "required",
    "allowNull",
    "default",
    "equal",
    "schema",
    "unknownKeys",
    "len",
    "unique",
    "autowrap",
    "trim",
    "match",
    "enum",
    "range",
    "errors",
];

impl Schema {
    /// Parses a JSON schema document.
    pub fn from_json(text: &str) -> SchemaResult<Schema> {
        let document: Json = serde_json::from_str(text)?;
        Schema::from_json_value(&document)
    }

    /// Interprets an already-parsed JSON document as a schema.
    pub fn from_json_value(document: &Json) -> SchemaResult<Schema> {
        parse_node(document)
    }
}

fn parse_node(document: &Json) -> SchemaResult<Schema> {
    match document {
        Json::String(name) => match Kind::from_name(name) {
            Some(kind) => Ok(Schema::Kind(kind)),
            None => Err(SchemaError::UnknownKind(name.clone())),
        },
        Json::Array(elements) => match elements.as_slice() {
            [] => Ok(Schema::Rule(Box::new(Rule::of(Kind::Array)))),
            [element] => Ok(Schema::Items(Box::new(parse_node(element)?))),
            _ => Err(SchemaError::InvalidShorthand(
                "a sequence shorthand holds exactly one element schema".to_string(),
            )),
        },
        Json::Object(entries) => {
            if entries.is_empty() {
                return Ok(Schema::Keys(Vec::new()));
            }
            let all_keywords = entries.keys().all(|key| RULE_KEYWORDS.contains(&key.as_str()));
            if all_keywords {
                parse_rule(entries).map(|rule| Schema::Rule(Box::new(rule)))
            } else {
                let mut pairs = Vec::with_capacity(entries.len());
                for (key, nested) in entries {
                    pairs.push((key.clone(), parse_node(nested)?));
                }
                Ok(Schema::Keys(pairs))
            }
        }
        other => Err(SchemaError::InvalidShorthand(format!(
            "a schema cannot be {}",
            json_shape(other)
        ))),
    }
}

fn parse_rule(entries: &serde_json::Map<String, Json>) -> SchemaResult<Rule> {
    let mut rule = Rule::new();

    for (keyword, value) in entries {
        match keyword.as_str() {
            "type" => {
                let name = expect_str(value, "type")?;
                rule.kind = match Kind::from_name(name) {
                    Some(kind) => Some(kind),
                    None => return Err(SchemaError::UnknownKind(name.to_string())),
                };
            }
            "required" => rule.required = Some(expect_bool(value, "required")?),
            "allowNull" => rule.allow_null = Some(expect_bool(value, "allowNull")?),
            "unique" => rule.unique = Some(expect_bool(value, "unique")?),
            "autowrap" => rule.autowrap = Some(expect_bool(value, "autowrap")?),
            "trim" => rule.trim = Some(expect_bool(value, "trim")?),
            "default" => rule.default = Some(DefaultSource::value(Value::from(value.clone()))),
            "equal" => rule.equal = Some(Value::from(value.clone())),
            "schema" => rule.schema = Some(parse_node(value)?),
            "unknownKeys" => {
                rule.unknown_keys = Some(match expect_str(value, "unknownKeys")? {
                    "allow" => UnknownKeys::Allow,
                    "deny" => UnknownKeys::Deny,
                    "remove" => UnknownKeys::Remove,
                    other => {
                        return Err(SchemaError::InvalidShorthand(format!(
                            "\"unknownKeys\" takes allow, deny or remove, not \"{}\"",
                            other
                        )));
                    }
                });
            }
            "len" => rule.len = Some(range_text(value, "len")?),
            "range" => rule.range = Some(range_text(value, "range")?),
            "match" => rule.pattern = Some(expect_str(value, "match")?.to_string()),
            "enum" => {
                let allowed = value.as_array().ok_or_else(|| {
                    SchemaError::InvalidShorthand("\"enum\" takes a list of strings".to_string())
                })?;
                let mut one_of = Vec::with_capacity(allowed.len());
                for entry in allowed {
                    one_of.push(expect_str(entry, "enum")?.to_string());
                }
                rule.one_of = Some(one_of);
            }
            "errors" => {
                let table = value.as_object().ok_or_else(|| {
                    SchemaError::InvalidShorthand(
                        "\"errors\" maps validator names to messages".to_string(),
                    )
                })?;
                for (name, message) in table {
                    let stage = Stage::from_name(name)
                        .ok_or_else(|| SchemaError::UnknownStage(name.clone()))?;
                    rule.messages.set(stage, expect_str(message, "errors")?);
                }
            }
            // Unreachable: the caller only dispatches keyword keys.
            _ => {}
        }
    }

    Ok(rule)
}

fn expect_str<'a>(value: &'a Json, keyword: &str) -> SchemaResult<&'a str> {
    value.as_str().ok_or_else(|| {
        SchemaError::InvalidShorthand(format!("\"{}\" takes a string, got {}", keyword, json_shape(value)))
    })
}

fn expect_bool(value: &Json, keyword: &str) -> SchemaResult<bool> {
    value.as_bool().ok_or_else(|| {
        SchemaError::InvalidShorthand(format!("\"{}\" takes a boolean, got {}", keyword, json_shape(value)))
    })
}

fn range_text(value: &Json, keyword: &str) -> SchemaResult<String> {
    match value {
        Json::String(text) => Ok(text.clone()),
        Json::Number(number) => Ok(number.to_string()),
        other => Err(SchemaError::InvalidShorthand(format!(
            "\"{}\" takes range text, got {}",
            keyword,
            json_shape(other)
        ))),
    }
}

fn json_shape(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
