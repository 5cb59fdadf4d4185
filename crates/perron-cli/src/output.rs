//! Shared output layer for human/JSON parity across CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its result
//! accordingly: key/value text for humans, stable JSON for machines. The
//! JSON form of `analyze` is the full [`ChainAnalysis`] record, unmodified,
//! so scripted consumers see exactly what the engine produced.

use std::io::{self, Write};

use perron_core::{ChainAnalysis, Validity};

/// Width of the key column in human output.
const KEY_WIDTH: usize = 22;

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Key/value text for terminals.
    Human,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Derive the mode from the global `--json` flag.
    #[must_use]
    pub const fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }
}

/// Render a left-aligned key/value line in human output.
fn kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<KEY_WIDTH$} {}", format!("{key}:"), value.as_ref())
}

fn join_ids(ids: &[String]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.join(", ")
    }
}

fn format_classes(classes: &[Vec<String>]) -> String {
    if classes.is_empty() {
        return "-".to_string();
    }
    classes
        .iter()
        .map(|members| format!("{{{}}}", members.join(", ")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_vector(values: &[f64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a full analysis record.
pub fn render_analysis(
    w: &mut dyn Write,
    record: &ChainAnalysis,
    mode: OutputMode,
) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        serde_json::to_writer_pretty(&mut *w, record)?;
        writeln!(w)?;
        return Ok(());
    }

    kv(w, "states", record.state_count.to_string())?;
    kv(w, "valid", if record.valid { "yes" } else { "no" })?;
    if !record.valid {
        kv(w, "invalid rows", join_ids(&record.invalid_states))?;
    }
    kv(
        w,
        "communicating classes",
        format_classes(&record.communicating_classes),
    )?;
    kv(w, "transient states", join_ids(&record.transient_states))?;
    kv(
        w,
        "recurrent classes",
        format_classes(&record.recurrent_classes),
    )?;

    for p in &record.periods {
        kv(
            w,
            &format!("period of class {}", p.class),
            format!("{} ({:?})", p.period, p.label),
        )?;
    }

    kv(
        w,
        "unique steady state",
        if record.unique_steady_state { "yes" } else { "no" },
    )?;
    if let Some(pi) = &record.steady_state {
        kv(w, "steady state", format_vector(pi))?;
    }
    Ok(())
}

/// Render a validation outcome.
pub fn render_validity(
    w: &mut dyn Write,
    validity: &Validity,
    mode: OutputMode,
) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        let body = serde_json::json!({
            "valid": validity.valid,
            "invalid_states": validity.invalid_states,
        });
        serde_json::to_writer_pretty(&mut *w, &body)?;
        writeln!(w)?;
        return Ok(());
    }

    if validity.valid {
        writeln!(w, "VALID: every row sums to 1")?;
    } else {
        writeln!(
            w,
            "INVALID: rows not summing to 1: {}",
            join_ids(&validity.invalid_states)
        )?;
    }
    Ok(())
}

/// Render a propagated distribution.
pub fn render_distribution(
    w: &mut dyn Write,
    states: &[String],
    distribution: &[f64],
    mode: OutputMode,
) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        let body = serde_json::json!({
            "states": states,
            "distribution": distribution,
        });
        serde_json::to_writer_pretty(&mut *w, &body)?;
        writeln!(w)?;
        return Ok(());
    }

    for (id, p) in states.iter().zip(distribution) {
        kv(w, id, p.to_string())?;
    }
    Ok(())
}
