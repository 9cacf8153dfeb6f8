use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Opt-in JSON-lines timing log for one `generate` run. Span lines are
/// written as they happen; aggregated totals go out on `summary`.
#[derive(Clone, Debug)]
pub(crate) struct PerfLogger {
    inner: Arc<Mutex<PerfState>>,
}

#[derive(Debug)]
struct PerfState {
    writer: BufWriter<File>,
    span_totals: HashMap<String, f64>,
    span_counts: HashMap<String, u64>,
}

impl PerfLogger {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(PerfState {
                writer: BufWriter::new(file),
                span_totals: HashMap::new(),
                span_counts: HashMap::new(),
            })),
        })
    }

    /// `build` tags the span with the atlas it belongs to ("1x"/"2x"), or
    /// null for whole-run spans like input discovery.
    pub fn log_span_ms(&self, name: &str, build: Option<&str>, ms: f64) {
        let build = build
            .map(|v| format!("\"{}\"", json_escape(v)))
            .unwrap_or_else(|| "null".to_string());
        let json = format!(
            "{{\"type\":\"perf.span\",\"name\":\"{}\",\"build\":{},\"unit\":\"ms\",\"ms\":{:.3}}}",
            json_escape(name),
            build,
            ms
        );
        if let Ok(mut state) = self.inner.lock() {
            *state.span_totals.entry(name.to_string()).or_insert(0.0) += ms;
            let entry = state.span_counts.entry(name.to_string()).or_insert(0);
            *entry = entry.saturating_add(1);
            let _ = writeln!(state.writer, "{json}");
        }
    }

    pub fn log_count(&self, name: &str, value: u64) {
        let json = format!(
            "{{\"type\":\"perf.count\",\"name\":\"{}\",\"value\":{}}}",
            json_escape(name),
            value
        );
        if let Ok(mut state) = self.inner.lock() {
            let _ = writeln!(state.writer, "{json}");
        }
    }

    pub fn summary(&self) {
        if let Ok(mut state) = self.inner.lock() {
            let mut spans: Vec<(String, f64, u64)> = state
                .span_totals
                .iter()
                .map(|(name, ms)| {
                    let count = *state.span_counts.get(name).unwrap_or(&1);
                    (name.clone(), *ms, count)
                })
                .collect();
            spans.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            for (name, ms, count) in spans {
                let json = format!(
                    "{{\"type\":\"perf.summary\",\"name\":\"{}\",\"unit\":\"ms\",\"ms\":{:.3},\"count\":{}}}",
                    json_escape(&name),
                    ms,
                    count
                );
                let _ = writeln!(state.writer, "{json}");
            }
            let _ = state.writer.flush();
        }
    }
}

pub(crate) fn json_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
