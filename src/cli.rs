//! Interface de linha de comando do votum baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (list, get, crawl)
//! e flags globais (--config, --concurrency, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

/// votum — Extrai iniciativas populares e resultados da cronologia da Chancelaria Federal.
#[derive(Debug, Parser)]
#[command(name = "votum", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho para um arquivo de configuração (padrão: ./votum.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Número máximo de iniciativas extraídas em paralelo.
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lista as URLs das páginas de detalhe, da mais nova para a mais antiga.
    List,

    /// Extrai uma única iniciativa e imprime o resultado em JSON.
    Get {
        /// URL da página de detalhe da iniciativa.
        url: Url,
    },

    /// Extrai todas as iniciativas da cronologia.
    Crawl {
        /// Processa apenas as N primeiras iniciativas.
        #[arg(long)]
        limit: Option<usize>,

        /// Arquivo JSON de saída (padrão: stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
