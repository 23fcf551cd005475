//! Configuração do votum carregada a partir de `votum.toml`.
//!
//! A struct [`VotumConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `VOTUM_INDEX_URL` tem precedência sobre o arquivo.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::VotumError;

/// Configuração de nível superior carregada de `votum.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct VotumConfig {
    /// Página da cronologia com a lista de todas as iniciativas.
    #[serde(default = "default_index_url")]
    pub index_url: String,

    /// Base das páginas de resultado, completada com `AAAAMMDD/index.html`.
    #[serde(default = "default_results_base_url")]
    pub results_base_url: String,

    /// Tempo máximo por requisição HTTP, em segundos.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Tempo máximo para estabelecer a conexão, em segundos.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Número máximo de iniciativas extraídas em paralelo.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Valor do cabeçalho `User-Agent`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Tabela de correções adicional, anexada às correções embutidas.
    #[serde(default)]
    pub overrides_path: Option<PathBuf>,
}

// Cronologia das iniciativas populares da Chancelaria Federal.
fn default_index_url() -> String {
    "https://www.bk.admin.ch/ch/d/pore/vi/vis_2_2_5_1.html".to_string()
}

fn default_results_base_url() -> String {
    "https://www.bk.admin.ch/ch/d/pore/va/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    4
}

fn default_user_agent() -> String {
    format!("votum/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for VotumConfig {
    fn default() -> Self {
        Self {
            index_url: default_index_url(),
            results_base_url: default_results_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
            overrides_path: None,
        }
    }
}

impl VotumConfig {
    /// Carrega a configuração de `votum.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        let path = Path::new("votum.toml");
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        Ok(config.with_env())
    }

    /// Carrega a configuração de um arquivo explícito (`--config`).
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self::from_file(path)?.with_env())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str::<VotumConfig>(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    // Variável de ambiente tem precedência sobre o arquivo de configuração.
    fn with_env(mut self) -> Self {
        if let Some(url) = std::env::var("VOTUM_INDEX_URL").ok().filter(|u| !u.is_empty()) {
            self.index_url = url;
        }
        self
    }

    /// Verifica URLs e limites antes do uso.
    pub fn validate(&self) -> Result<(), VotumError> {
        self.index_url()?;
        self.results_base_url()?;
        if self.concurrency == 0 {
            return Err(VotumError::Config("concurrency must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(VotumError::Config("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn index_url(&self) -> Result<Url, VotumError> {
        Url::parse(&self.index_url)
            .map_err(|e| VotumError::Config(format!("invalid index_url {:?}: {e}", self.index_url)))
    }

    /// URL base das páginas de resultado, sempre terminada em `/`.
    pub fn results_base_url(&self) -> Result<Url, VotumError> {
        let mut raw = self.results_base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| {
            VotumError::Config(format!(
                "invalid results_base_url {:?}: {e}",
                self.results_base_url
            ))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
