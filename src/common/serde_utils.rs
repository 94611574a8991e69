// src/common/serde_utils.rs

use serde::{Deserialize, Deserializer};

// Distingue "campo ausente" de "campo presente com null" em payloads de PATCH.
// Ausente  -> None            (não mexe na coluna)
// null     -> Some(None)      (limpa a coluna)
// valor    -> Some(Some(v))   (grava o valor)
// Usar junto com #[serde(default)].
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "double_option")]
        due_at: Option<Option<String>>,
    }

    #[test]
    fn campo_ausente_vira_none() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert!(body.due_at.is_none());
    }

    #[test]
    fn null_explicito_vira_some_none() {
        let body: Body = serde_json::from_str(r#"{"due_at": null}"#).unwrap();
        assert_eq!(body.due_at, Some(None));
    }

    #[test]
    fn valor_vira_some_some() {
        let body: Body = serde_json::from_str(r#"{"due_at": "2025-06-01T12:00:00Z"}"#).unwrap();
        assert_eq!(body.due_at, Some(Some("2025-06-01T12:00:00Z".to_string())));
    }
}
