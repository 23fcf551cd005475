//! Interface de terminal do votum — spinner e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`CrawlProgress`] acompanha visualmente
//! a extração em lote no terminal (stderr, para não poluir o JSON).

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use votum::chronology::CrawlRecord;

/// Indicador visual de progresso para uma extração em lote.
///
/// Exibe um spinner com a contagem e uma linha colorida por iniciativa:
/// sucesso (verde) ou falha (vermelho).
pub struct CrawlProgress {
    // Spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para mensagens de sucesso.
    green: Style,
    // Estilo vermelho para mensagens de falha.
    red: Style,
    // Estilo atenuado para o status da votação.
    dim: Style,
    total: usize,
    done: usize,
    failed: usize,
}

impl CrawlProgress {
    /// Inicia o spinner para `total` iniciativas.
    pub fn start(total: usize) -> Self {
        let pb = ProgressBar::new_spinner();
        // Template fixo; um erro aqui só mantém o estilo padrão.
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("0/{total} iniciativas"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
            total,
            done: 0,
            failed: 0,
        }
    }

    /// Registra uma iniciativa concluída e atualiza o spinner.
    pub fn record(&mut self, record: &CrawlRecord) {
        self.done += 1;
        match &record.outcome {
            Ok(ballot) => {
                self.pb.println(format!(
                    "  {} {} {}",
                    self.green.apply_to("✓"),
                    ballot.bill().title,
                    self.dim.apply_to(ballot.status())
                ));
            }
            Err(e) => {
                self.failed += 1;
                self.pb.println(format!(
                    "  {} {}: {e}",
                    self.red.apply_to("✗"),
                    record.url
                ));
            }
        }
        self.pb
            .set_message(format!("{}/{} iniciativas", self.done, self.total));
    }

    /// Finaliza o spinner e exibe o resumo.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
        let extracted = self.done - self.failed;
        eprintln!(
            "  {} {extracted} extraídas, {} {} falharam",
            self.green.apply_to("✓"),
            self.red.apply_to("✗"),
            self.failed
        );
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}
