//! Identifier conversions for generated code.

/// `UPPER_SNAKE` or `snake_case` to `CamelCase`.
///
/// Each `_`-separated part keeps its first character and lowercases the
/// rest, so `LOW_FREQUENCY_1_COUNTER` becomes `LowFrequency1Counter`.
/// Names that would start with a digit get a `Val` prefix.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for part in name.split('_').filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "Val");
    }
    out
}

/// Setter name for a property.
pub fn setter(name: &str) -> String {
    format!("set_{name}")
}

/// Reset method name for a property.
pub fn resetter(name: &str) -> String {
    format!("reset_{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_conversions() {
        assert_eq!(camel_case("RIGHT"), "Right");
        assert_eq!(camel_case("PSEUDO_DIFF"), "PseudoDiff");
        assert_eq!(camel_case("LOW_FREQUENCY_1_COUNTER"), "LowFrequency1Counter");
        assert_eq!(camel_case("X_4"), "X4");
        assert_eq!(camel_case("INVALID_ATTRIBUTE_VALUE"), "InvalidAttributeValue");
        assert_eq!(camel_case("10_V"), "Val10V");
    }

    #[test]
    fn accessor_names() {
        assert_eq!(setter("ai_max"), "set_ai_max");
        assert_eq!(resetter("ai_max"), "reset_ai_max");
    }
}
