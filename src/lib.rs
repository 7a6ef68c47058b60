mod apuracao;
mod args;
mod composicao;
mod error;
mod imagem;
mod metadata;
mod regex;

pub use self::{
    apuracao::*, args::*, composicao::*, error::*, imagem::*, metadata::*, regex::*,
};
