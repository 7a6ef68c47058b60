use std::{io, path::PathBuf};
use thiserror::Error;

/// Tipo de retorno conveniente para todo o projeto
pub type ComposicaoResult<T> = Result<T, ComposicaoError>;

#[derive(Error, Debug)]
pub enum ComposicaoError {
    #[error(
        "Planilha não encontrada!\n\
        Arquivo: {arquivo:?}\n\
        Planilha esperada: <{planilha}>"
    )]
    PlanilhaAusente { arquivo: PathBuf, planilha: String },

    #[error("Coluna essencial ausente na planilha de apuração <{arquivo}>: {coluna}")]
    ColunaAusente { arquivo: PathBuf, coluna: String },

    #[error("Planilha de apuração <{arquivo}> contém colunas repetidas: <{coluna}>")]
    ColunaDuplicada { arquivo: PathBuf, coluna: String },

    #[error(
        "Período inválido: <{0}>\n\
        Formato esperado: MM.AAAA (exemplo: 03.2025)\n\
        Mês entre 01 e 12, ano entre 2020 e 2030."
    )]
    PeriodoInvalido(String),

    #[error("Erro ao ler a planilha de apuração: {0}")]
    Calamine(#[from] calamine::XlsxError),

    #[error("Erro ao processar a pasta de trabalho xlsx: {0}")]
    Xlsx(#[from] umya_spreadsheet::XlsxError),

    #[error("Erro na estrutura da pasta de trabalho: {0}")]
    EstruturaPastaTrabalho(String),

    #[error("Erro ao processar a imagem: {0}")]
    Imagem(#[from] image::ImageError),

    #[error("Erro de I/O: {0}")]
    Io(#[from] io::Error),

    #[error(
        "Arquivo de apuração não encontrado!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    IoReader {
        #[source] // Indica que este é o erro original
        source: io::Error,
        arquivo: PathBuf,
    },
}
