//! Conversions between `<input>`/`<select>` string values and typed fields.

use std::str::FromStr;

/// Empty select value means "none"; unknown values are ignored as well
pub fn parse_optional<T: FromStr>(value: &str) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        value.parse().ok()
    }
}

/// Value for a select bound to an optional field
pub fn optional_value<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Text input bound to an optional string field
pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Amount typed in euros ("12,50" or "12.5") to cents
pub fn parse_euros(value: &str) -> Result<Option<i64>, String> {
    let value = value.trim().replace(',', ".");
    if value.is_empty() {
        return Ok(None);
    }
    let amount: f64 = value
        .parse()
        .map_err(|_| format!("Montant invalide : {}", value))?;
    if amount < 0.0 {
        return Err("Les coûts ne peuvent pas être négatifs".into());
    }
    Ok(Some((amount * 100.0).round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::EquipmentStatus;

    #[test]
    fn optional_selects() {
        assert_eq!(parse_optional::<EquipmentStatus>("broken"), Some(EquipmentStatus::Broken));
        assert_eq!(parse_optional::<EquipmentStatus>(""), None);
        assert_eq!(parse_optional::<i32>("12"), Some(12));
        assert_eq!(parse_optional::<i32>("abc"), None);
        assert_eq!(optional_value(Some(3)), "3");
        assert_eq!(optional_value::<i32>(None), "");
    }

    #[test]
    fn text_fields() {
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" GA-37 "), Some("GA-37".into()));
    }

    #[test]
    fn euros_to_cents() {
        assert_eq!(parse_euros("12,50"), Ok(Some(1250)));
        assert_eq!(parse_euros("80"), Ok(Some(8000)));
        assert_eq!(parse_euros(""), Ok(None));
        assert!(parse_euros("-3").is_err());
        assert!(parse_euros("abc").is_err());
    }
}
