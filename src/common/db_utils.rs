// ---
// Helpers de paginação
// ---
// Regra das listagens: sem limit (ou limit 0) usa o padrão da rota, e nunca
// se devolve mais que o teto, por maior que seja o pedido.

pub(crate) fn clamp_limit(requested: Option<i64>, default: i64, cap: i64) -> i64 {
    match requested {
        Some(limit) if limit != 0 => limit.min(cap),
        _ => default,
    }
}

pub(crate) fn offset_or_zero(requested: Option<i64>) -> i64 {
    requested.unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limite_ausente_ou_zero_usa_o_padrao() {
        assert_eq!(clamp_limit(None, 50, 100), 50);
        assert_eq!(clamp_limit(Some(0), 50, 100), 50);
        assert_eq!(clamp_limit(None, 20, 50), 20);
    }

    #[test]
    fn limite_acima_do_teto_e_cortado() {
        assert_eq!(clamp_limit(Some(500), 50, 100), 100);
        assert_eq!(clamp_limit(Some(100), 50, 100), 100);
        assert_eq!(clamp_limit(Some(51), 20, 50), 50);
    }

    #[test]
    fn limite_dentro_do_teto_passa_direto() {
        assert_eq!(clamp_limit(Some(10), 50, 100), 10);
        assert_eq!(clamp_limit(Some(1), 20, 50), 1);
    }

    #[test]
    fn offset_ausente_vira_zero() {
        assert_eq!(offset_or_zero(None), 0);
        assert_eq!(offset_or_zero(Some(40)), 40);
    }
}
