use regex::Regex;
use std::sync::LazyLock;

/// Dia de vencimento no início de uma data textual.
/// Captura 1 ou 2 dígitos seguidos de '/' ou '-' (Ex: "5/10/2024", "15-03").
pub static REGEX_DIA_VENCIMENTO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[/-]").unwrap());

/// Token de período no formato MM.AAAA (Ex: "03.2025").
/// Os intervalos de mês e ano são validados à parte, em args.rs.
pub static REGEX_PERIODO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})\.(\d{4})$").unwrap());
