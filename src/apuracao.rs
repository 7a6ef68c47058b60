use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use std::collections::HashMap;

use crate::{
    COLUNAS_APURACAO, ComposicaoError, ComposicaoResult, Config, PLANILHA_APURACAO,
};

/// Valor de uma célula da planilha de apuração.
///
/// As colunas da apuração misturam datas, números e textos livres
/// (o vencimento, por exemplo, chega nas três representações).
/// A união etiquetada substitui a inspeção de tipos em tempo de
/// execução por um único `match` em cada ponto de uso.
#[derive(Debug, Clone, PartialEq)]
pub enum Valor {
    Data(NaiveDateTime),
    Numero(f64),
    Texto(String),
    Vazio,
}

impl From<&Data> for Valor {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Valor::Vazio,
            Data::String(s) => Valor::Texto(s.clone()),
            Data::Float(f) => Valor::Numero(*f),
            Data::Int(i) => Valor::Numero(*i as f64),
            Data::Bool(b) => Valor::Texto(b.to_string()),
            // Serial sem data válida (anterior a 1900, por exemplo) degrada para número.
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(Valor::Data)
                .unwrap_or(Valor::Numero(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Valor::Texto(s.clone()),
            Data::Error(_) => Valor::Vazio,
        }
    }
}

impl Valor {
    /// Coerção numérica tolerante a nulos: valores ausentes ou não
    /// numéricos valem 0.0 para fins de totalização.
    /// Aceita vírgula como separador decimal.
    pub fn como_numero(&self) -> f64 {
        match self {
            Valor::Numero(n) if n.is_finite() => *n,
            Valor::Texto(s) => s.trim().replace(',', ".").parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Forma textual do valor. Números inteiros são exibidos sem a
    /// parte fracionária ("1" em vez de "1.0") para que códigos de
    /// filial numéricos gerem nomes de planilha legíveis.
    pub fn como_texto(&self) -> String {
        match self {
            Valor::Vazio => String::new(),
            Valor::Texto(s) => s.clone(),
            Valor::Numero(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Valor::Numero(n) => n.to_string(),
            Valor::Data(dt) => dt.format("%d/%m/%Y").to_string(),
        }
    }
}

/// Uma linha da tabela de apuração, com as 17 colunas essenciais.
#[derive(Debug, Clone)]
pub struct RegistroApuracao {
    pub num_doc_contabil: Valor,
    pub num_nf: Valor,
    pub base_iss: Valor,
    pub aliquota: Valor,
    pub multa: Valor,
    pub juros: Valor,
    pub taxa_emissao: Valor,
    pub iss_retido: Valor,
    pub cnpj_prestador: Valor,
    pub data_documento: Valor,
    pub data_lancamento: Valor,
    pub municipio_prestador: Valor,
    pub cod_servicos: Valor,
    pub filial: Valor,
    pub cnpj_filial: Valor,
    pub endereco: Valor,
    pub vencimento: Valor,
}

impl RegistroApuracao {
    /// Chave de filial normalizada (string aparada).
    pub fn chave_filial(&self) -> String {
        self.filial.como_texto().trim().to_string()
    }
}

/// Lê a tabela de apuração do arquivo de origem.
pub fn ler_apuracao(config: &Config) -> ComposicaoResult<Vec<RegistroApuracao>> {
    // 1. Abertura do arquivo xlsx com contexto de erro para arquivo inexistente.
    let mut workbook: Xlsx<_> = open_workbook(&config.arquivo).map_err(|e| match e {
        calamine::XlsxError::Io(source) => ComposicaoError::IoReader {
            source,
            arquivo: config.arquivo.clone(),
        },
        outro => ComposicaoError::Calamine(outro),
    })?;

    // 2. A aba de apuração precisa existir.
    if !workbook
        .sheet_names()
        .iter()
        .any(|nome| nome == PLANILHA_APURACAO)
    {
        return Err(ComposicaoError::PlanilhaAusente {
            arquivo: config.arquivo.clone(),
            planilha: PLANILHA_APURACAO.to_string(),
        });
    }

    let intervalo = workbook.worksheet_range(PLANILHA_APURACAO)?;
    let mut linhas = intervalo.rows();

    // 3. Cabeçalho: nomes de colunas com espaços aparados.
    let cabecalho: Vec<String> = linhas
        .next()
        .map(|linha| {
            linha
                .iter()
                .map(|celula| Valor::from(celula).como_texto().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    // 4. Validação centralizada das colunas essenciais.
    let indices = resolver_colunas_essenciais(&cabecalho, config)?;

    let pega = |linha: &[Data], chave: &str| -> Valor {
        indices
            .get(chave)
            .and_then(|&idx| linha.get(idx))
            .map(Valor::from)
            .unwrap_or(Valor::Vazio)
    };

    // 5. Materialização dos registros, na ordem da planilha.
    let registros = linhas
        .map(|linha| RegistroApuracao {
            num_doc_contabil: pega(linha, "num_doc_contabil"),
            num_nf: pega(linha, "num_nf"),
            base_iss: pega(linha, "base_iss"),
            aliquota: pega(linha, "aliquota"),
            multa: pega(linha, "multa"),
            juros: pega(linha, "juros"),
            taxa_emissao: pega(linha, "taxa_emissao"),
            iss_retido: pega(linha, "iss_retido"),
            cnpj_prestador: pega(linha, "cnpj_prestador"),
            data_documento: pega(linha, "data_documento"),
            data_lancamento: pega(linha, "data_lancamento"),
            municipio_prestador: pega(linha, "municipio_prestador"),
            cod_servicos: pega(linha, "cod_servicos"),
            filial: pega(linha, "filial"),
            cnpj_filial: pega(linha, "cnpj_filial"),
            endereco: pega(linha, "endereco"),
            vencimento: pega(linha, "vencimento"),
        })
        .collect();

    Ok(registros)
}

/// Localiza a posição de cada coluna essencial no cabeçalho.
///
/// Colunas essenciais repetidas ou ausentes interrompem o processamento;
/// células de cabeçalho em branco são toleradas (exportações costumam
/// trazer colunas extras sem nome).
fn resolver_colunas_essenciais(
    cabecalho: &[String],
    config: &Config,
) -> ComposicaoResult<HashMap<&'static str, usize>> {
    let mut indices = HashMap::with_capacity(COLUNAS_APURACAO.len());

    for (&chave, &nome) in COLUNAS_APURACAO.iter() {
        let mut posicoes = cabecalho.iter().enumerate().filter(|(_, c)| *c == nome);

        let idx = match (posicoes.next(), posicoes.next()) {
            (Some(_), Some(_)) => {
                return Err(ComposicaoError::ColunaDuplicada {
                    arquivo: config.arquivo.clone(),
                    coluna: nome.to_string(),
                });
            }
            (Some((idx, _)), None) => idx,
            (None, _) => {
                return Err(ComposicaoError::ColunaAusente {
                    arquivo: config.arquivo.clone(),
                    coluna: nome.to_string(),
                });
            }
        };

        indices.insert(chave, idx);
    }

    if config.verbose {
        println!("\nPlanilha validada: <{}>", config.arquivo.display());
        for (i, nome) in cabecalho.iter().enumerate() {
            println!("  coluna [{:02}]: '{}'", i + 1, nome);
        }
        println!();
    }

    Ok(indices)
}

/// Agrupa os registros por chave de filial, preservando a ordem de
/// primeira aparição. Chaves vazias não geram composição.
pub fn agrupar_por_filial(
    registros: Vec<RegistroApuracao>,
) -> IndexMap<String, Vec<RegistroApuracao>> {
    let mut grupos: IndexMap<String, Vec<RegistroApuracao>> = IndexMap::new();

    for registro in registros {
        let chave = registro.chave_filial();
        if chave.is_empty() {
            continue;
        }
        grupos.entry(chave).or_default().push(registro);
    }

    grupos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registro_com_filial(filial: Valor) -> RegistroApuracao {
        RegistroApuracao {
            num_doc_contabil: Valor::Vazio,
            num_nf: Valor::Vazio,
            base_iss: Valor::Vazio,
            aliquota: Valor::Vazio,
            multa: Valor::Vazio,
            juros: Valor::Vazio,
            taxa_emissao: Valor::Vazio,
            iss_retido: Valor::Vazio,
            cnpj_prestador: Valor::Vazio,
            data_documento: Valor::Vazio,
            data_lancamento: Valor::Vazio,
            municipio_prestador: Valor::Vazio,
            cod_servicos: Valor::Vazio,
            filial,
            cnpj_filial: Valor::Vazio,
            endereco: Valor::Vazio,
            vencimento: Valor::Vazio,
        }
    }

    #[test]
    fn coercao_numerica_tolerante_a_nulos() {
        let valores = [
            Valor::Numero(10.0),
            Valor::Numero(20.0),
            Valor::Texto("x".to_string()),
            Valor::Vazio,
        ];
        let soma: f64 = valores.iter().map(Valor::como_numero).sum();
        assert_eq!(soma, 30.0);
    }

    #[test]
    fn coercao_numerica_aceita_virgula() {
        assert_eq!(Valor::Texto("3,5".to_string()).como_numero(), 3.5);
        assert_eq!(Valor::Texto(" 10 ".to_string()).como_numero(), 10.0);
    }

    #[test]
    fn texto_de_numero_inteiro_sem_fracao() {
        assert_eq!(Valor::Numero(1.0).como_texto(), "1");
        assert_eq!(Valor::Numero(1.5).como_texto(), "1.5");
        assert_eq!(Valor::Vazio.como_texto(), "");
    }

    #[test]
    fn conversao_de_celulas_calamine() {
        assert_eq!(Valor::from(&Data::Empty), Valor::Vazio);
        assert_eq!(Valor::from(&Data::Int(7)), Valor::Numero(7.0));
        assert_eq!(
            Valor::from(&Data::String("abc".to_string())),
            Valor::Texto("abc".to_string())
        );
    }

    #[test]
    fn agrupamento_preserva_ordem_de_aparicao() {
        let registros = vec![
            registro_com_filial(Valor::Texto("002".to_string())),
            registro_com_filial(Valor::Texto("001".to_string())),
            registro_com_filial(Valor::Texto("002".to_string())),
            registro_com_filial(Valor::Texto("".to_string())),
            registro_com_filial(Valor::Vazio),
        ];

        let grupos = agrupar_por_filial(registros);
        let chaves: Vec<&String> = grupos.keys().collect();

        assert_eq!(chaves, ["002", "001"]);
        assert_eq!(grupos["002"].len(), 2);
        assert_eq!(grupos["001"].len(), 1);
    }

    #[test]
    fn chave_de_filial_numerica_sem_fracao() {
        let registro = registro_com_filial(Valor::Numero(1.0));
        assert_eq!(registro.chave_filial(), "1");
    }
}
