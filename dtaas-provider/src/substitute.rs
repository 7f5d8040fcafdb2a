//! Recursive placeholder substitution over YAML value trees.
//!
//! This is a pure transform with no compose-specific knowledge: given
//! a tree of mappings, sequences, and strings, every string (keys
//! included) has each token of the mapping replaced verbatim. The node
//! type is a closed set, so anything the templates are not allowed to
//! contain fails at the deepest offending node.

use indexmap::IndexMap;
use serde_yaml_ng::{Mapping, Value};

use dtaas_core::error::{DtaasError, Result};

/// Token → replacement mapping. Insertion order is the replacement
/// order within a string, which keeps renders deterministic.
pub type TokenMap = IndexMap<String, String>;

/// Produce a copy of `node` with every token occurrence replaced.
///
/// First failure wins: an unsupported node anywhere in the tree fails
/// the whole call with no partial result.
pub fn substitute(node: &Value, mapping: &TokenMap) -> Result<Value> {
    match node {
        Value::String(s) => Ok(Value::String(replace_tokens(s, mapping))),
        Value::Sequence(items) => {
            let out: Result<Vec<Value>> =
                items.iter().map(|item| substitute(item, mapping)).collect();
            Ok(Value::Sequence(out?))
        }
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, value) in map {
                let Value::String(key) = key else {
                    return Err(DtaasError::Substitution(
                        "mapping key is not a string".into(),
                    ));
                };
                out.insert(
                    Value::String(replace_tokens(key, mapping)),
                    substitute(value, mapping)?,
                );
            }
            Ok(Value::Mapping(out))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Tagged(_) => Err(
            DtaasError::Substitution(format!("unsupported node type: {}", node_kind(node))),
        ),
    }
}

fn replace_tokens(s: &str, mapping: &TokenMap) -> String {
    let mut result = s.to_string();
    for (token, value) in mapping {
        result = result.replace(token, value);
    }
    result
}

fn node_kind(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
