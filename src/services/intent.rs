// src/services/intent.rs

use regex::Regex;
use std::sync::OnceLock;

// ---
// Roteamento de intenção das mensagens do webhook
// ---
// Lista de regras em ordem fixa: gatilho de busca, texto só de dígitos,
// e o resto cai no fallback. Sem memória de conversa entre mensagens.

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SearchProperties {
        neighborhood: Option<String>,
        property_type: Option<String>,
        max_value: Option<f64>,
    },
    GetProperty {
        property_id: i64,
    },
    Help,
    Fallback,
}

pub fn classify(text: &str) -> Intent {
    let text = text.trim();
    if text.is_empty() {
        return Intent::Help;
    }
    let lower = text.to_lowercase();

    if search_trigger_pattern().is_match(&lower) {
        return Intent::SearchProperties {
            neighborhood: extract_neighborhood(text),
            property_type: extract_property_type(&lower),
            max_value: extract_max_value(text),
        };
    }

    if digits_pattern().is_match(text) {
        // Número grande demais para i64 não é id de imóvel nenhum.
        return match text.parse::<i64>() {
            Ok(property_id) => Intent::GetProperty { property_id },
            Err(_) => Intent::Fallback,
        };
    }

    Intent::Fallback
}

fn search_trigger_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\bbuscar\b|\bimóveis?\b|\balugar\b|\bcomprar\b")
            .expect("padrão de gatilho de busca inválido")
    })
}

fn digits_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+$").expect("padrão numérico inválido"))
}

fn neighborhood_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:bairro|no bairro|em)\s+([a-záàâãéêíóôõúç\s]+?)(?:\s|,|\.|$)")
            .expect("padrão de bairro inválido")
    })
}

fn millions_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:até|máximo|max|valor\s+)?(?:de\s+)?(?:r\$\s*)?(\d+(?:[.,]\d+)?)\s*(?:milh[oõ]es?|mi)\b")
            .expect("padrão de milhões inválido")
    })
}

fn thousands_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:até|máximo|max|valor\s+)?(?:de\s+)?(?:r\$\s*)?(\d+(?:[.,]\d+)?)\s*(?:mil|k)\b")
            .expect("padrão de milhares inválido")
    })
}

fn plain_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:até|máximo|max|valor\s+)?(?:de\s+)?(?:r\$\s*)?(\d{4,})")
            .expect("padrão de valor inválido")
    })
}

pub fn extract_neighborhood(text: &str) -> Option<String> {
    let captures = neighborhood_pattern().captures(text)?;
    let neighborhood = captures.get(1)?.as_str().trim();
    if neighborhood.is_empty() {
        None
    } else {
        Some(neighborhood.to_string())
    }
}

pub fn extract_property_type(lower: &str) -> Option<String> {
    static APARTMENT: OnceLock<Regex> = OnceLock::new();
    static HOUSE: OnceLock<Regex> = OnceLock::new();
    static LAND: OnceLock<Regex> = OnceLock::new();
    static COMMERCIAL: OnceLock<Regex> = OnceLock::new();

    let apartment = APARTMENT.get_or_init(|| {
        Regex::new(r"\bapartamento\b|apto\b").expect("padrão de apartamento inválido")
    });
    let house = HOUSE.get_or_init(|| Regex::new(r"\bcasa\b").expect("padrão de casa inválido"));
    let land = LAND.get_or_init(|| Regex::new(r"\bterreno\b").expect("padrão de terreno inválido"));
    let commercial = COMMERCIAL
        .get_or_init(|| Regex::new(r"\bcomercial\b").expect("padrão de comercial inválido"));

    if apartment.is_match(lower) {
        Some("apartment".to_string())
    } else if house.is_match(lower) {
        Some("house".to_string())
    } else if land.is_match(lower) {
        Some("land".to_string())
    } else if commercial.is_match(lower) {
        Some("commercial".to_string())
    } else {
        None
    }
}

/// Extrai o teto de valor da mensagem (ex.: "até 500 mil", "máximo 1 milhão",
/// "até R$ 300000"). Só retorna número finito e positivo.
pub fn extract_max_value(text: &str) -> Option<f64> {
    let lower = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if let Some(captures) = millions_pattern().captures(&lower) {
        let n: f64 = captures[1].replace(',', ".").parse().ok()?;
        return positive(n).map(|n| n * 1_000_000.0);
    }
    if let Some(captures) = thousands_pattern().captures(&lower) {
        let n: f64 = captures[1].replace(',', ".").parse().ok()?;
        return positive(n).map(|n| n * 1_000.0);
    }
    if let Some(captures) = plain_number_pattern().captures(&lower) {
        let n: f64 = captures[1].parse().ok()?;
        return positive(n);
    }
    None
}

fn positive(n: f64) -> Option<f64> {
    if n.is_finite() && n > 0.0 {
        Some(n)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busca_com_bairro_e_teto_de_valor() {
        let intent = classify("buscar imóveis no bairro Pinheiros até 500 mil");
        assert_eq!(
            intent,
            Intent::SearchProperties {
                neighborhood: Some("Pinheiros".to_string()),
                property_type: None,
                max_value: Some(500_000.0),
            }
        );
    }

    #[test]
    fn numero_puro_vira_consulta_de_imovel() {
        assert_eq!(classify("42"), Intent::GetProperty { property_id: 42 });
        assert_eq!(
            classify("  731  "),
            Intent::GetProperty { property_id: 731 }
        );
    }

    #[test]
    fn mensagem_vazia_pede_ajuda() {
        assert_eq!(classify(""), Intent::Help);
        assert_eq!(classify("   "), Intent::Help);
    }

    #[test]
    fn mensagem_sem_gatilho_cai_no_fallback() {
        assert_eq!(classify("oi"), Intent::Fallback);
        assert_eq!(classify("bom dia, tudo bem?"), Intent::Fallback);
    }

    #[test]
    fn numero_grande_demais_cai_no_fallback() {
        assert_eq!(classify("99999999999999999999999"), Intent::Fallback);
    }

    #[test]
    fn tipo_de_imovel_por_palavra_chave() {
        let intent = classify("quero comprar um apartamento em Moema");
        match intent {
            Intent::SearchProperties {
                neighborhood,
                property_type,
                max_value,
            } => {
                assert_eq!(neighborhood.as_deref(), Some("Moema"));
                assert_eq!(property_type.as_deref(), Some("apartment"));
                assert_eq!(max_value, None);
            }
            other => panic!("intenção inesperada: {:?}", other),
        }

        assert_eq!(extract_property_type("alugar casa"), Some("house".to_string()));
        assert_eq!(extract_property_type("buscar terreno"), Some("land".to_string()));
        assert_eq!(
            extract_property_type("ponto comercial"),
            Some("commercial".to_string())
        );
        assert_eq!(extract_property_type("qualquer coisa"), None);
    }

    #[test]
    fn teto_de_valor_em_milhoes_milhares_e_absoluto() {
        assert_eq!(extract_max_value("até 2 milhões"), Some(2_000_000.0));
        assert_eq!(extract_max_value("máximo 1,5 mi"), Some(1_500_000.0));
        assert_eq!(extract_max_value("até 500 mil"), Some(500_000.0));
        assert_eq!(extract_max_value("300k"), Some(300_000.0));
        assert_eq!(extract_max_value("até R$ 300000"), Some(300_000.0));
        assert_eq!(extract_max_value("valor de 450000"), Some(450_000.0));
    }

    #[test]
    fn teto_de_valor_ausente_ou_invalido() {
        assert_eq!(extract_max_value("sem valor nenhum"), None);
        assert_eq!(extract_max_value("até 500"), None); // menos de 4 dígitos
        assert_eq!(extract_max_value("0 mil"), None);
    }

    #[test]
    fn bairro_depois_de_em_ou_bairro() {
        assert_eq!(
            extract_neighborhood("buscar em Copacabana"),
            Some("Copacabana".to_string())
        );
        assert_eq!(
            extract_neighborhood("no bairro Lapa, por favor"),
            Some("Lapa".to_string())
        );
        assert_eq!(extract_neighborhood("buscar imóveis"), None);
    }
}
