use std::collections::HashMap;
use std::sync::LazyLock;

// --- Planilhas e arquivo de saída ---

/// Planilha de origem com a tabela de apuração do ISS Retido.
pub const PLANILHA_APURACAO: &str = "apuração exemplo";

/// Planilha modelo cuja formatação é clonada para cada filial.
pub const PLANILHA_MODELO: &str = "ModeloComposicao";

/// Prefixo do nome das planilhas geradas (Ex: "Filial_001").
pub const PREFIXO_FILIAL: &str = "Filial_";

/// Nome padrão do arquivo gerado no diretório de trabalho.
pub const ARQUIVO_SAIDA: &str = "composicoes_geradas.xlsx";

// --- Layout fixo da planilha modelo ---

/// Linha modelo de detalhe: as linhas de notas começam aqui
/// e herdam a formatação desta linha.
pub const LINHA_MODELO: u32 = 15;

/// Intervalo de colunas (A..M) coberto pela clonagem de formatação
/// e pelas mesclagens dos blocos de informações.
pub const COLUNA_INICIAL: u32 = 1;
pub const COLUNA_FINAL: u32 = 13;

/// Células fixas do cabeçalho de cada composição.
pub const CELULA_CNPJ_FILIAL: &str = "B6";
pub const CELULA_FILIAL: &str = "B7";
pub const CELULA_ENDERECO: &str = "B8";
pub const CELULA_MARCADOR: &str = "B9";
pub const CELULA_PERIODO: &str = "B10";
pub const CELULA_VENCIMENTO: &str = "B11";

/// Rótulo fixo gravado em B9.
pub const MARCADOR_ISS_RETIDO: &str = "ISS RETIDO";

/// Sentinela para vencimento ausente.
pub const VENCIMENTO_NAO_DISPONIVEL: &str = "N/D";

/// Rótulos do bloco de totais, na ordem das 5 linhas.
pub const ROTULOS_TOTAIS: [&str; 5] = [
    "Total ISS",
    "Total Multa",
    "Total Juros",
    "Total Taxa",
    "Total Geral",
];

/// Formato contábil brasileiro aplicado às células de valores dos totais.
pub const FORMATO_CONTABIL: &str =
    r#"_-"R$"* #,##0.00_-;-"R$"* -#,##0.00_-;_-"R$"* "-"??_-;_-@_-"#;

/// Banner do bloco de informações adicionais.
pub const ROTULO_INFORMACOES: &str = "Informações adicionais:";
pub const COR_BANNER: &str = "002060";
pub const COR_FONTE_BANNER: &str = "FFFFFF";

/// Área mesclada de anotações livres abaixo do banner.
pub const LINHAS_AREA_ANOTACOES: u32 = 6;

// --- Logotipo ---

/// Caixa delimitadora do logotipo (bloco A1:B4).
pub const LOGO_LARGURA_MAXIMA: u32 = 350;
pub const LOGO_ALTURA_MAXIMA: u32 = 100;
pub const LOGO_INTERVALO_MESCLADO: &str = "A1:B4";
pub const LOGO_ALTURA_LINHA: f64 = 20.0;
pub const LOGO_LARGURA_COLUNA: f64 = 25.0;

// --- Período ---

/// Intervalo de anos aceito no token de período (MM.AAAA),
/// o mesmo oferecido pela lista de períodos da interface original.
pub const ANO_INICIAL: u32 = 2020;
pub const ANO_FINAL: u32 = 2030;

// Mapeamento estático para colunas da planilha de apuração
pub static COLUNAS_APURACAO: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("filial", "Local Prest.Serviço II"),
        ("cnpj_filial", "CNPJ FILIAL"),
        ("endereco", "Local Prest. Serviço"),
        ("vencimento", "Vencimento"),
        ("num_doc_contabil", "NÚM. DOC. CONTÁBIL"),
        ("num_nf", "Nº NF"),
        ("base_iss", "Base ISS"),
        ("aliquota", "Aliquota"),
        ("multa", "Multa"),
        ("juros", "Juros"),
        ("taxa_emissao", "Taxa de Emissão"),
        ("iss_retido", "ISS Retido"),
        ("cnpj_prestador", "CNPJ Prestador"),
        ("data_documento", "Data documento"),
        ("data_lancamento", "Data de lançamento"),
        ("municipio_prestador", "Município Prestador"),
        ("cod_servicos", "Cód. Serviços"),
    ])
});
