//! Redaction policy per field path of a report payload.

use serde_json::{Map, Value};

/// What happens to the value at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Drop the field entirely.
    Remove,
    /// Keep only the listed child keys. Non-object values are dropped.
    KeepOnly(&'static [&'static str]),
}

/// A rule bound to a JSON pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    pub path: &'static str,
    pub rule: FieldRule,
}

/// Report payload policy. The intern record keeps only the program track and the
/// supervisor record is removed.
pub const REPORT_POLICY: &[FieldPolicy] = &[
    FieldPolicy {
        path: "/estagiario",
        rule: FieldRule::KeepOnly(&["curso"]),
    },
    FieldPolicy {
        path: "/supervisor",
        rule: FieldRule::Remove,
    },
];

/// Keys removed wherever they appear in a payload.
pub const SENSITIVE_KEYS: &[&str] = &[
    "nome_completo",
    "nome",
    "email",
    "telefone",
    "phone",
    "celular",
    "cpf",
    "rg",
    "nusp",
    "numero_usp",
    "endereco",
    "address",
];

/// Apply every path rule in `policy` to `payload`.
pub fn apply_policy(payload: &mut Value, policy: &[FieldPolicy]) {
    for entry in policy {
        let Some((parent_path, key)) = entry.path.rsplit_once('/') else {
            continue;
        };
        let Some(Value::Object(parent)) = payload.pointer_mut(parent_path) else {
            continue;
        };
        match entry.rule {
            FieldRule::Remove => {
                parent.remove(key);
            }
            FieldRule::KeepOnly(allowed) => {
                let keep = match parent.get_mut(key) {
                    Some(Value::Object(child)) => {
                        child.retain(|k, _| allowed.contains(&k.as_str()));
                        true
                    }
                    Some(_) => false,
                    None => true,
                };
                if !keep {
                    parent.remove(key);
                }
            }
        }
    }
}

/// Remove sensitive keys at any depth.
pub fn strip_sensitive_keys(value: &mut Value, extra: &[String]) {
    match value {
        Value::Object(map) => {
            map.retain(|k, _| !is_sensitive_key(k, extra));
            for child in map.values_mut() {
                strip_sensitive_keys(child, extra);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_sensitive_keys(item, extra);
            }
        }
        _ => {}
    }
}

pub fn is_sensitive_key(key: &str, extra: &[String]) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_KEYS.contains(&key.as_str()) || extra.iter().any(|e| e.eq_ignore_ascii_case(&key))
}

/// First path in `value` that still violates the policy, if any.
pub fn find_violation(value: &Value, extra: &[String]) -> Option<String> {
    for entry in REPORT_POLICY {
        match (entry.rule, value.pointer(entry.path)) {
            (FieldRule::Remove, Some(_)) => return Some(entry.path.to_string()),
            (FieldRule::KeepOnly(allowed), Some(Value::Object(child))) => {
                if let Some(k) = child.keys().find(|k| !allowed.contains(&k.as_str())) {
                    return Some(format!("{}/{k}", entry.path));
                }
            }
            (FieldRule::KeepOnly(_), Some(_)) => return Some(entry.path.to_string()),
            _ => {}
        }
    }
    find_sensitive_key(value, extra, String::new())
}

fn find_sensitive_key(value: &Value, extra: &[String], path: String) -> Option<String> {
    match value {
        Value::Object(map) => find_in_map(map, extra, &path),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| find_sensitive_key(item, extra, format!("{path}/{i}"))),
        _ => None,
    }
}

fn find_in_map(map: &Map<String, Value>, extra: &[String], path: &str) -> Option<String> {
    map.iter().find_map(|(k, v)| {
        let child = format!("{path}/{k}");
        if is_sensitive_key(k, extra) {
            Some(child)
        } else {
            find_sensitive_key(v, extra, child)
        }
    })
}
