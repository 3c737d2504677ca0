// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::Deserialize;
use serde_json::Value;

use super::Sink;
use crate::error::{Error, Result};
use crate::observation::Fields;

#[derive(Deserialize)]
struct Catalogue {
    #[serde(default)]
    environments: Vec<Environment>,
}

#[derive(Deserialize)]
struct Environment {
    env: Option<String>,
    #[serde(default)]
    registers: Vec<Value>,
}

pub(super) fn parse(origin: &str, src: &str, sink: &mut Sink) -> Result<()> {
    let catalogue: Catalogue = serde_json::from_str(src)
        .map_err(|e| Error::Parse { path: origin.to_string(), message: e.to_string() })?;

    for (env_idx, env) in catalogue.environments.iter().enumerate() {
        sink.begin_environment();

        let Some(label) = env.env.as_deref() else {
            return Err(sink.malformed(format!("environment #{env_idx} has no `env`")));
        };

        for reg in &env.registers {
            let Some(reg) = reg.as_object() else {
                return Err(sink.malformed(format!("register entry of {label:?} is not an object")));
            };
            let Some(name) = reg.get("name").and_then(Value::as_str) else {
                return Err(sink.malformed(format!("register entry of {label:?} has no `name`")));
            };

            // `preserve_order` keeps the map in document order.
            let mut fields = Fields::new();
            for (key, value) in reg.iter().filter(|(k, _)| k.as_str() != "name") {
                let value = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => {
                        return Err(sink.malformed(format!(
                            "field `{key}` of {name} in {label:?} is not a scalar"
                        )));
                    }
                };
                fields.push(key.as_str(), value);
            }

            sink.push(label, name, fields);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::{Format, parse};
    use crate::error::Error;

    #[test]
    fn test_json_catalogue() {
        let src = r#"{
            "environments": [
                {
                    "env": "Mac Studio M1 Ultra, macOS 15, QEMU 8.0/TCG, cpu max",
                    "registers": [
                        { "name": "SPSR_EL1", "mode": "EL0t", "d": false, "bits": "0x0", "el": 0 }
                    ]
                },
                { "env": "empty" }
            ]
        }"#;
        let observations = parse("test.json", src, Format::Json).unwrap();

        assert_eq!(observations.len(), 1);
        let obs = &observations[0];
        assert_eq!(obs.register_name(), "SPSR_EL1");
        assert_eq!(obs.fields().names().collect::<Vec<_>>(), ["mode", "d", "bits", "el"]);
        assert_eq!(obs.fields().get("d"), Some("false"));
        assert_eq!(obs.fields().get("el"), Some("0"));
    }

    #[test]
    fn test_json_missing_env() {
        let src = r#"{ "environments": [ { "env": "a", "registers": [ { "name": "R" } ] },
                                         { "registers": [ { "name": "R" } ] } ] }"#;
        let err = parse("test.json", src, Format::Json).unwrap_err();
        assert!(matches!(err, Error::MalformedObservation { index: 1, .. }));
    }

    #[test]
    fn test_json_nested_value_is_rejected() {
        let src = r#"{ "environments": [ { "env": "a", "registers": [ { "name": "R", "x": [1] } ] } ] }"#;
        let err = parse("test.json", src, Format::Json).unwrap_err();
        assert!(matches!(err, Error::MalformedObservation { index: 0, .. }));
    }

    #[test]
    fn test_json_syntax_error() {
        let err = parse("test.json", "{ \"environments\": [", Format::Json).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
