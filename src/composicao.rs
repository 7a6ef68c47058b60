use chrono::Datelike;
use umya_spreadsheet::{Font, Worksheet, reader, writer};

use crate::{
    CELULA_CNPJ_FILIAL, CELULA_ENDERECO, CELULA_FILIAL, CELULA_MARCADOR, CELULA_PERIODO,
    CELULA_VENCIMENTO, COLUNA_FINAL, COLUNA_INICIAL, COR_BANNER, COR_FONTE_BANNER,
    ComposicaoError, ComposicaoResult, Config, FORMATO_CONTABIL, LINHA_MODELO,
    LINHAS_AREA_ANOTACOES, MARCADOR_ISS_RETIDO, PLANILHA_MODELO, PREFIXO_FILIAL,
    REGEX_DIA_VENCIMENTO, ROTULO_INFORMACOES, ROTULOS_TOTAIS, VENCIMENTO_NAO_DISPONIVEL, Valor,
    agrupar_por_filial, anexar_logotipo, ler_apuracao,
};

/// Normaliza o vencimento em um dia do mês com dois dígitos.
///
/// Regras, em ordem:
/// 1. Valor ausente ou texto vazio -> sentinela "N/D".
/// 2. Data -> dia com zero à esquerda.
/// 3. Número entre 1 e 31 -> dia com zero à esquerda;
///    fora do intervalo -> parte inteira, sem preenchimento.
/// 4. Texto iniciado por 1 ou 2 dígitos seguidos de '/' ou '-' -> esse dia.
/// 5. Texto só de dígitos entre 1 e 31 -> dia com zero à esquerda.
/// 6. Qualquer outro texto -> o próprio texto aparado (entrada não
///    reconhecida é preservada em vez de falhar).
pub fn formatar_dia_vencimento(vencimento: &Valor) -> String {
    match vencimento {
        Valor::Vazio => VENCIMENTO_NAO_DISPONIVEL.to_string(),
        Valor::Texto(s) if s.is_empty() => VENCIMENTO_NAO_DISPONIVEL.to_string(),
        Valor::Data(dt) => format!("{:02}", dt.day()),
        Valor::Numero(n) => {
            // Truncamento em direção ao zero, como a conversão inteira original.
            let dia = *n as i64;
            if (1..=31).contains(&dia) {
                format!("{dia:02}")
            } else {
                dia.to_string()
            }
        }
        Valor::Texto(s) => {
            let texto = s.trim();

            if let Some(caps) = REGEX_DIA_VENCIMENTO.captures(texto) {
                return format!("{:0>2}", &caps[1]);
            }

            if !texto.is_empty()
                && texto.chars().all(|c| c.is_ascii_digit())
                && texto
                    .parse::<u32>()
                    .is_ok_and(|dia| (1..=31).contains(&dia))
            {
                return format!("{texto:0>2}");
            }

            texto.to_string()
        }
    }
}

/// Formata a alíquota como percentual inteiro.
///
/// Aceita vírgula como separador decimal. Valores abaixo de 1 são
/// tratados como fração ("0,05" -> "5%"); valores a partir de 1 já
/// estão em percentual ("5" -> "5%"). Falha de parse preserva a
/// forma textual original.
pub fn formatar_aliquota(aliquota: &Valor) -> String {
    let bruto = aliquota.como_texto();

    match bruto.trim().replace(',', ".").parse::<f64>() {
        Ok(v) if !v.is_finite() => bruto,
        Ok(v) if v < 1.0 => format!("{}%", (v * 100.0).round() as i64),
        Ok(v) => format!("{}%", v.round() as i64),
        Err(_) => bruto,
    }
}

/// Clona a formatação de uma linha modelo para outra linha, nas
/// colunas A..M, incluindo a altura da linha.
///
/// Cada célula de destino recebe uma cópia própria do estilo
/// (fonte, bordas, preenchimento, formato numérico, proteção e
/// alinhamento); origem e destino nunca compartilham o mesmo objeto.
pub fn copiar_formatacao_linha(ws: &mut Worksheet, origem: u32, destino: u32) {
    for coluna in COLUNA_INICIAL..=COLUNA_FINAL {
        let estilo = ws
            .get_cell((coluna, origem))
            .map(|celula| celula.get_style().clone())
            .unwrap_or_default();
        ws.get_cell_mut((coluna, destino)).set_style(estilo);
    }

    let altura = ws
        .get_row_dimension(&origem)
        .map(|linha| *linha.get_height())
        .unwrap_or_default();
    ws.get_row_dimension_mut(&destino).set_height(altura);
}

/// Grava um valor de apuração em uma célula, preservando o tipo:
/// números como números, datas como "dd/mm/aaaa", vazio fica vazio.
fn escrever_valor(ws: &mut Worksheet, coluna: u32, linha: u32, valor: &Valor) {
    let celula = ws.get_cell_mut((coluna, linha));
    match valor {
        Valor::Numero(n) => {
            celula.set_value_number(*n);
        }
        Valor::Data(dt) => {
            celula.set_value_string(dt.format("%d/%m/%Y").to_string());
        }
        Valor::Texto(s) => {
            celula.set_value_string(s.as_str());
        }
        Valor::Vazio => {}
    }
}

/// Gera uma composição por filial a partir da planilha de apuração.
///
/// Retorna `Ok(true)` quando ao menos uma composição foi gerada e
/// `Ok(false)` quando a apuração não tinha dados aproveitáveis; a
/// pasta de trabalho é gravada em `config.saida` nos dois casos.
/// Falhas de imagem são reportadas e ignoradas; qualquer outra falha
/// interrompe antes da gravação, de modo que nunca persiste um
/// arquivo parcialmente montado.
pub fn gerar_composicoes(config: &Config) -> ComposicaoResult<bool> {
    // 1. Carregar e agrupar a tabela de apuração.
    let registros = ler_apuracao(config)?;
    let grupos = agrupar_por_filial(registros);

    // 2. Abrir o mesmo arquivo como alvo de saída; a saída começa
    //    limpa, apenas com a planilha modelo.
    let mut pasta = reader::xlsx::read(&config.arquivo)?;

    if pasta.get_sheet_by_name(PLANILHA_MODELO).is_none() {
        return Err(ComposicaoError::PlanilhaAusente {
            arquivo: config.arquivo.clone(),
            planilha: PLANILHA_MODELO.to_string(),
        });
    }

    let nomes: Vec<String> = pasta
        .get_sheet_collection_no_check()
        .iter()
        .map(|ws| ws.get_name().to_string())
        .collect();

    for nome in nomes {
        if nome != PLANILHA_MODELO {
            pasta
                .remove_sheet_by_name(&nome)
                .map_err(|e| ComposicaoError::EstruturaPastaTrabalho(e.to_string()))?;
        }
    }

    let mut gerou = false;

    // 3. Uma composição por filial, na ordem de primeira aparição.
    for (filial, registros) in &grupos {
        if registros.is_empty() {
            continue;
        }
        gerou = true;

        let mut planilha = pasta
            .get_sheet_by_name(PLANILHA_MODELO)
            .ok_or_else(|| ComposicaoError::PlanilhaAusente {
                arquivo: config.arquivo.clone(),
                planilha: PLANILHA_MODELO.to_string(),
            })?
            .clone();
        planilha.set_name(format!("{PREFIXO_FILIAL}{filial}"));

        let ws = pasta
            .add_sheet(planilha)
            .map_err(|e| ComposicaoError::EstruturaPastaTrabalho(e.to_string()))?;

        // 4. Logotipo opcional; falha aqui não interrompe a geração.
        if let Some(caminho) = &config.imagem
            && caminho.exists()
            && let Err(e) = anexar_logotipo(ws, caminho)
        {
            eprintln!(" [AVISO] Não foi possível adicionar a imagem: {e}");
        }

        // 5. Cabeçalho da composição.
        let primeiro = &registros[0];
        ws.get_cell_mut(CELULA_CNPJ_FILIAL)
            .set_value_string(primeiro.cnpj_filial.como_texto());
        ws.get_cell_mut(CELULA_FILIAL)
            .set_value_string(filial.as_str());
        ws.get_cell_mut(CELULA_ENDERECO)
            .set_value_string(primeiro.endereco.como_texto());
        ws.get_cell_mut(CELULA_MARCADOR)
            .set_value_string(MARCADOR_ISS_RETIDO);
        ws.get_cell_mut(CELULA_PERIODO)
            .set_value_string(config.periodo.as_str());
        ws.get_cell_mut(CELULA_VENCIMENTO)
            .set_value_string(formatar_dia_vencimento(&primeiro.vencimento));

        // 6. Bloco de detalhe: uma linha por nota, na ordem da apuração.
        for (i, registro) in registros.iter().enumerate() {
            let linha = LINHA_MODELO + i as u32;
            copiar_formatacao_linha(ws, LINHA_MODELO, linha);

            escrever_valor(ws, 1, linha, &registro.num_doc_contabil);
            escrever_valor(ws, 2, linha, &registro.num_nf);
            escrever_valor(ws, 3, linha, &registro.base_iss);
            ws.get_cell_mut((4, linha))
                .set_value_string(formatar_aliquota(&registro.aliquota));
            escrever_valor(ws, 5, linha, &registro.multa);
            escrever_valor(ws, 6, linha, &registro.juros);
            escrever_valor(ws, 7, linha, &registro.taxa_emissao);
            escrever_valor(ws, 8, linha, &registro.iss_retido);
            escrever_valor(ws, 9, linha, &registro.cnpj_prestador);
            escrever_valor(ws, 10, linha, &registro.data_documento);
            escrever_valor(ws, 11, linha, &registro.data_lancamento);
            escrever_valor(ws, 12, linha, &registro.municipio_prestador);
            escrever_valor(ws, 13, linha, &registro.cod_servicos);
        }

        // 7. Bloco de totais: 5 linhas, uma linha em branco após o detalhe.
        let quantidade = registros.len() as u32;
        let linha_totais = LINHA_MODELO + quantidade + 1;

        for i in 0..ROTULOS_TOTAIS.len() as u32 {
            copiar_formatacao_linha(ws, LINHA_MODELO, linha_totais + i);
        }

        let total_iss: f64 = registros.iter().map(|r| r.iss_retido.como_numero()).sum();
        let total_multa: f64 = registros.iter().map(|r| r.multa.como_numero()).sum();
        let total_juros: f64 = registros.iter().map(|r| r.juros.como_numero()).sum();
        let total_taxa: f64 = registros.iter().map(|r| r.taxa_emissao.como_numero()).sum();
        let total_geral = total_iss + total_multa + total_juros + total_taxa;

        let totais = [total_iss, total_multa, total_juros, total_taxa, total_geral];

        for (i, (rotulo, total)) in ROTULOS_TOTAIS.iter().zip(totais).enumerate() {
            let linha = linha_totais + i as u32;

            ws.get_cell_mut((1, linha)).set_value_string(*rotulo);
            ws.get_cell_mut((2, linha)).set_value_number(total);

            // Rótulo em negrito; valor com formato contábil.
            let mut fonte = Font::default();
            fonte.set_bold(true);
            ws.get_style_mut((1, linha)).set_font(fonte);
            ws.get_style_mut((2, linha))
                .get_number_format_mut()
                .set_format_code(FORMATO_CONTABIL);
        }

        // 8. Banner de informações adicionais e área livre de anotações.
        let linha_info = linha_totais + ROTULOS_TOTAIS.len() as u32 + 2;
        ws.get_cell_mut((1, linha_info))
            .set_value_string(ROTULO_INFORMACOES);

        let mut fonte = Font::default();
        fonte.set_bold(true);
        fonte.get_color_mut().set_argb(COR_FONTE_BANNER);
        let estilo = ws.get_style_mut((1, linha_info));
        estilo.set_font(fonte);
        estilo.set_background_color(COR_BANNER);

        ws.add_merge_cells(format!("A{linha_info}:M{linha_info}"));

        let linha_area = linha_info + 1;
        ws.add_merge_cells(format!(
            "A{linha_area}:M{}",
            linha_area + LINHAS_AREA_ANOTACOES - 1
        ));
    }

    // 9. Remover o modelo quando houve geração e gravar a saída.
    if gerou && pasta.get_sheet_by_name(PLANILHA_MODELO).is_some() {
        pasta
            .remove_sheet_by_name(PLANILHA_MODELO)
            .map_err(|e| ComposicaoError::EstruturaPastaTrabalho(e.to_string()))?;
    }

    writer::xlsx::write(&pasta, &config.saida)?;

    Ok(gerou)
}
