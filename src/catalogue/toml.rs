// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use toml_span::value::{Table, Value};

use super::Sink;
use crate::error::{Error, Result};
use crate::observation::Fields;

pub(super) fn parse(origin: &str, src: &str, sink: &mut Sink) -> Result<()> {
    let root = toml_span::parse(src)
        .map_err(|e| Error::Parse { path: origin.to_string(), message: e.to_string() })?;
    let Some(root) = root.as_table() else {
        return Err(sink.malformed("catalogue root is not a table"));
    };
    let Some(environments) = get(root, "environment") else {
        return Ok(());
    };
    let Some(environments) = environments.as_array() else {
        return Err(sink.malformed("`environment` must be an array of tables"));
    };

    for (env_idx, env) in environments.iter().enumerate() {
        sink.begin_environment();

        let Some(env) = env.as_table() else {
            return Err(sink.malformed(format!("environment #{env_idx} is not a table")));
        };
        let Some(label) = get(env, "name").and_then(|v| v.as_str()) else {
            return Err(sink.malformed(format!("environment #{env_idx} has no `name`")));
        };
        let Some(registers) = get(env, "register") else {
            continue;
        };
        let Some(registers) = registers.as_array() else {
            return Err(sink.malformed(format!("`register` of {label:?} is not an array")));
        };

        for reg in registers {
            let Some(reg) = reg.as_table() else {
                return Err(sink.malformed(format!("register entry of {label:?} is not a table")));
            };
            let Some(name) = get(reg, "name").and_then(|v| v.as_str()) else {
                return Err(sink.malformed(format!("register entry of {label:?} has no `name`")));
            };

            // Tables are keyed by name, so the authored order has to come from the spans.
            let mut entries: Vec<_> = reg.iter().filter(|(k, _)| k.name != "name").collect();
            entries.sort_by_key(|(k, _)| k.span.start);

            let mut fields = Fields::new();
            for (key, value) in entries {
                let Some(value) = scalar(src, value) else {
                    return Err(sink.malformed(format!(
                        "field `{}` of {name} in {label:?} is not a scalar",
                        key.name
                    )));
                };
                fields.push(key.name.to_string(), value);
            }

            sink.push(label, name, fields);
        }
    }

    Ok(())
}

fn get<'a, 'de>(table: &'a Table<'de>, key: &str) -> Option<&'a Value<'de>> {
    table.iter().find(|(k, _)| k.name == key).map(|(_, v)| v)
}

/// Numbers are kept as written, so `0x00c50838` stays hex and `1.0` keeps its fraction.
fn scalar(src: &str, value: &Value<'_>) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    if value.as_integer().is_none() && value.as_float().is_none() {
        return value.as_bool().map(|b| b.to_string());
    }
    match src.get(value.span.start..value.span.end).map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => value
            .as_integer()
            .map(|i| i.to_string())
            .or_else(|| value.as_float().map(|f| f.to_string())),
    }
}
