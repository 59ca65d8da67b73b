use serde::{Deserialize, Deserializer};

/// Deserializes an optional string, treating `""` the same as a missing value.
///
/// The API occasionally sends empty strings where a field is absent
/// (`"email": ""`, `"message": ""`); callers only ever care whether a
/// meaningful value is present.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        other => Ok(other),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

/// Deserializes an optional identifier sent either as a string or a number.
///
/// Numbers keep their JSON spelling (`42` becomes `"42"`); empty strings
/// are treated as missing.
pub fn deserialize_optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(match opt {
        Some(StringOrNumber::String(s)) if s.trim().is_empty() => None,
        Some(StringOrNumber::String(s)) => Some(s),
        Some(StringOrNumber::Number(n)) => Some(n.to_string()),
        None => None,
    })
}
