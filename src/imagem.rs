use image::{DynamicImage, ImageFormat, imageops::FilterType};
use std::path::Path;
use umya_spreadsheet::{Image, Worksheet, structs::drawing::spreadsheet::MarkerType};

use crate::{
    ComposicaoResult, LOGO_ALTURA_LINHA, LOGO_ALTURA_MAXIMA, LOGO_INTERVALO_MESCLADO,
    LOGO_LARGURA_COLUNA, LOGO_LARGURA_MAXIMA,
};

/// Redimensiona o logotipo para caber no bloco A1:B4 (350x100),
/// preservando a proporção, com reamostragem Lanczos.
pub fn redimensionar_logotipo(caminho: &Path) -> ComposicaoResult<DynamicImage> {
    let original = image::open(caminho)?;
    Ok(original.resize(LOGO_LARGURA_MAXIMA, LOGO_ALTURA_MAXIMA, FilterType::Lanczos3))
}

/// Insere o logotipo redimensionado no canto superior esquerdo da
/// planilha e reserva o bloco A1:B4 para ele (mesclagem, altura das
/// linhas 1..4 e largura das colunas A e B).
///
/// Qualquer falha aqui é não fatal: quem chama registra o aviso e a
/// geração segue sem imagem.
pub fn anexar_logotipo(ws: &mut Worksheet, caminho: &Path) -> ComposicaoResult<()> {
    let logotipo = redimensionar_logotipo(caminho)?;

    // A pasta de trabalho incorpora imagens a partir de arquivos;
    // o png reamostrado passa por um arquivo temporário.
    let temporario = tempfile::Builder::new().suffix(".png").tempfile()?;
    logotipo.save_with_format(temporario.path(), ImageFormat::Png)?;
    let caminho_png = temporario.path().to_string_lossy().to_string();

    let mut marcador = MarkerType::default();
    marcador.set_coordinate("A1");
    let mut imagem = Image::default();
    imagem.new_image(&caminho_png, marcador);
    ws.add_image(imagem);

    ws.add_merge_cells(LOGO_INTERVALO_MESCLADO);
    for linha in 1..=4u32 {
        ws.get_row_dimension_mut(&linha).set_height(LOGO_ALTURA_LINHA);
    }
    ws.get_column_dimension_mut("A").set_width(LOGO_LARGURA_COLUNA);
    ws.get_column_dimension_mut("B").set_width(LOGO_LARGURA_COLUNA);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbaImage};

    #[test]
    fn logotipo_largo_e_reduzido_para_a_caixa() {
        let dir = tempfile::tempdir().unwrap();
        let caminho = dir.path().join("logo.png");
        DynamicImage::ImageRgba8(RgbaImage::new(700, 100))
            .save_with_format(&caminho, ImageFormat::Png)
            .unwrap();

        let logotipo = redimensionar_logotipo(&caminho).unwrap();
        let (largura, altura) = logotipo.dimensions();

        assert_eq!((largura, altura), (350, 50));
    }

    #[test]
    fn logotipo_alto_e_limitado_pela_altura() {
        let dir = tempfile::tempdir().unwrap();
        let caminho = dir.path().join("logo.png");
        DynamicImage::ImageRgba8(RgbaImage::new(200, 400))
            .save_with_format(&caminho, ImageFormat::Png)
            .unwrap();

        let logotipo = redimensionar_logotipo(&caminho).unwrap();
        let (largura, altura) = logotipo.dimensions();

        assert_eq!((largura, altura), (50, 100));
    }

    #[test]
    fn arquivo_inexistente_reporta_erro() {
        assert!(redimensionar_logotipo(Path::new("nao_existe.png")).is_err());
    }
}
