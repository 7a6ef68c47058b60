use execution_time::ExecutionTime;
use std::process;

use gerador_de_composicoes::{ComposicaoResult, gerar_composicoes, get_config};

fn main() {
    // A forma mais idiomática de reportar erros ao usuário final sem stack trace técnico
    if let Err(err) = run() {
        eprintln!("\n[ERRO CRÍTICO]: {err}");
        process::exit(1);
    }
}

fn run() -> ComposicaoResult<()> {
    let timer = ExecutionTime::start();

    // 1. Obter Configurações
    let config = get_config()?;

    println!(" Gerador de Composições ISS\n");
    println!(" Arquivo de apuração: <{}>", config.arquivo.display());
    println!(" Período de apuração: {}", config.periodo);
    if let Some(imagem) = &config.imagem {
        println!(" Logotipo: <{}>", imagem.display());
    }

    if config.verbose {
        println!("\n{:#?}\n", config);
    }

    // 2. Gerar uma composição por filial
    let gerou = gerar_composicoes(&config)?;

    // 3. Mensagem consolidada de resultado
    if gerou {
        println!(
            "\n Composições geradas com sucesso!\n Arquivo: <{}>\n",
            config.saida.display()
        );
    } else {
        println!("\n [AVISO] Nenhuma composição foi gerada para o arquivo selecionado.\n");
    }

    timer.print_elapsed_time();

    Ok(())
}
