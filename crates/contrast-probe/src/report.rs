//! Evaluation and rendering for the probe subcommands.

use anyhow::{bail, Result};
use clap::ValueEnum;
use contrast_color::{parse_color, relative_luminance};
use contrast_engine::{
    decide, BackgroundSourceKind, ButtonKind, ContrastConfig, Decision, Outcome, PassReport,
    PropertyWrite, ResolvedBackground,
};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// What the engine would do with one background/text pairing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub background: String,
    pub background_luminance: f64,
    pub text: Option<String>,
    /// `None` when the text color is missing or unparseable.
    pub ratio: Option<f64>,
    pub verdict: Verdict,
    pub writes: Vec<PropertyWrite>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AlreadyLegible,
    DarkText,
    LightText,
}

impl Verdict {
    fn label(self) -> &'static str {
        match self {
            Verdict::AlreadyLegible => "already legible",
            Verdict::DarkText => "dark text",
            Verdict::LightText => "light text",
        }
    }
}

/// Runs the decision for a single pairing.
///
/// Fails when the background itself cannot be parsed, since there is
/// nothing to report in that case.
pub fn check(
    config: &ContrastConfig,
    background: &str,
    text: Option<&str>,
    button: ButtonKind,
    from_accent: bool,
) -> Result<CheckResult> {
    let background = background.trim();
    let Some(bg) = parse_color(background) else {
        bail!("cannot parse background color {:?}", background);
    };
    let resolved = ResolvedBackground {
        color: background.to_string(),
        source: if from_accent {
            BackgroundSourceKind::Accent
        } else {
            BackgroundSourceKind::Computed
        },
        has_accent: from_accent,
    };

    let (verdict, ratio, writes) = match decide(config, &resolved, text.unwrap_or(""), button) {
        Decision::Legible { ratio } => (Verdict::AlreadyLegible, Some(ratio), Vec::new()),
        Decision::Override(o) => {
            let verdict = if o.use_dark_text {
                Verdict::DarkText
            } else {
                Verdict::LightText
            };
            (verdict, o.current_ratio, o.writes)
        }
        Decision::Skip(reason) => bail!("no decision for {:?}: {}", background, reason),
    };

    Ok(CheckResult {
        background: resolved.color,
        background_luminance: relative_luminance(bg),
        text: text.map(str::to_string),
        ratio,
        verdict,
        writes,
    })
}

pub fn render_check(result: &CheckResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(result)?),
        OutputFormat::Text => {
            let mut out = String::new();
            writeln!(
                out,
                "background  {} (luminance {:.4})",
                result.background, result.background_luminance
            )?;
            match (&result.text, result.ratio) {
                (Some(text), Some(ratio)) => writeln!(out, "text        {} (ratio {:.2}:1)", text, ratio)?,
                (Some(text), None) => writeln!(out, "text        {} (unparseable)", text)?,
                (None, _) => writeln!(out, "text        (unknown)")?,
            }
            write!(out, "decision    {}", result.verdict.label())?;
            write_properties(&mut out, &result.writes, "")?;
            Ok(out)
        }
    }
}

pub fn render_scan(report: &PassReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Text => {
            if report.is_empty() {
                return Ok("no marked elements".to_string());
            }
            let mut out = String::new();
            for (i, entry) in report.outcomes.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                write!(out, "{:<5} ", entry.element.to_string())?;
                match &entry.outcome {
                    Outcome::Unchanged => write!(out, "unchanged")?,
                    Outcome::Skipped { reason } => write!(out, "skipped: {}", reason)?,
                    Outcome::AlreadyLegible { background, ratio } => {
                        write!(out, "legible on {} ({:.2}:1)", background, ratio)?
                    }
                    Outcome::Overridden {
                        background,
                        use_dark_text,
                        writes,
                        ..
                    } => {
                        let tone = if *use_dark_text { "dark" } else { "light" };
                        write!(out, "{} text on {}", tone, background)?;
                        write_properties(&mut out, writes, "      ")?;
                    }
                }
            }
            write!(
                out,
                "\n\n{} overridden, {} legible, {} skipped",
                report.overridden(),
                report.legible(),
                report.skipped()
            )?;
            Ok(out)
        }
    }
}

fn write_properties(out: &mut String, writes: &[PropertyWrite], indent: &str) -> std::fmt::Result {
    for w in writes {
        write!(out, "\n{}  {}: {}", indent, w.name, w.value)?;
    }
    Ok(())
}
