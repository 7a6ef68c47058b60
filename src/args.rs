use clap::Parser;
use std::path::PathBuf;

use crate::{
    ANO_FINAL, ANO_INICIAL, ARQUIVO_SAIDA, ComposicaoError, ComposicaoResult, REGEX_PERIODO,
};

// Estrutura para o Clap processar os argumentos da linha de comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Planilha de apuração (xlsx) contendo a aba "apuração exemplo"
    /// e a aba modelo "ModeloComposicao".
    #[arg(short, long, required = true)]
    arquivo: PathBuf,

    /// Período de apuração no formato MM.AAAA.
    ///
    /// Exemplo: `03.2025`
    #[arg(short, long, required = true)]
    periodo: String,

    /// Logotipo opcional (png, jpg, bmp, gif) inserido no bloco A1:B4
    /// de cada composição.
    #[arg(short, long)]
    imagem: Option<PathBuf>,

    /// Arquivo xlsx gerado.
    #[arg(short, long, default_value = ARQUIVO_SAIDA)]
    saida: PathBuf,

    /// Ativar modo detalhado (verbose)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug)]
pub struct Config {
    pub arquivo: PathBuf,
    pub periodo: String,
    pub imagem: Option<PathBuf>,
    pub saida: PathBuf,
    pub verbose: bool,
}

pub fn get_config() -> ComposicaoResult<Config> {
    let args = Arguments::parse();

    // 1. Validar o token de período antes de qualquer I/O.
    validar_periodo(&args.periodo)?;

    // 2. Avisar aqui sobre logotipo inexistente; a geração segue sem imagem.
    if let Some(caminho) = &args.imagem
        && !caminho.exists()
    {
        eprintln!(
            " [AVISO] Logotipo não encontrado: <{}>. A geração seguirá sem imagem.",
            caminho.display()
        );
    }

    Ok(Config {
        arquivo: args.arquivo,
        periodo: args.periodo,
        imagem: args.imagem,
        saida: args.saida,
        verbose: args.verbose,
    })
}

/// Valida o token de período: MM.AAAA, mês 01..12, ano 2020..2030.
pub fn validar_periodo(periodo: &str) -> ComposicaoResult<()> {
    let caps = REGEX_PERIODO
        .captures(periodo)
        .ok_or_else(|| ComposicaoError::PeriodoInvalido(periodo.to_string()))?;

    // As capturas são dígitos puros; o parse não falha.
    let mes: u32 = caps[1].parse().unwrap_or_default();
    let ano: u32 = caps[2].parse().unwrap_or_default();

    if (1..=12).contains(&mes) && (ANO_INICIAL..=ANO_FINAL).contains(&ano) {
        Ok(())
    } else {
        Err(ComposicaoError::PeriodoInvalido(periodo.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodo_valido() {
        assert!(validar_periodo("01.2020").is_ok());
        assert!(validar_periodo("12.2030").is_ok());
        assert!(validar_periodo("03.2025").is_ok());
    }

    #[test]
    fn periodo_invalido() {
        assert!(validar_periodo("13.2025").is_err()); // mês inexistente
        assert!(validar_periodo("00.2025").is_err());
        assert!(validar_periodo("03.2019").is_err()); // fora do intervalo de anos
        assert!(validar_periodo("03.2031").is_err());
        assert!(validar_periodo("3.2025").is_err()); // sem zero à esquerda
        assert!(validar_periodo("03/2025").is_err());
        assert!(validar_periodo("").is_err());
    }
}
