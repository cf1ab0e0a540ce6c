// src/report.rs
// =============================================================================
// Everything the user reads on stdout goes through the Reporter.
//
// Two kinds of output:
// - The live trace, printed while the crawl runs (one line per link)
// - The final summary of problematic links, printed once at the end
//
// Lines are column-aligned: the URL is padded to 70 characters so the
// status tags line up.
//
// With --json the summary is printed as JSON on stdout and the live trace
// moves to stderr, so the JSON can be piped into other tools.
// =============================================================================

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::checker::LinkRecord;

type Sink = Mutex<Box<dyn Write + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    Text,
    Json,
}

pub struct Reporter {
    trace: Sink,
    summary: Sink,
    format: SummaryFormat,
}

// The final summary: every record that failed or didn't answer 200
#[derive(Debug, Serialize)]
pub struct Summary {
    pub problematic: usize,
    pub links: Vec<LinkRecord>,
}

impl Summary {
    pub fn from_snapshot(snapshot: Vec<(String, LinkRecord)>) -> Self {
        let links: Vec<LinkRecord> = snapshot
            .into_iter()
            .map(|(_, record)| record)
            .filter(|record| !record.is_ok())
            .collect();

        Summary {
            problematic: links.len(),
            links,
        }
    }
}

impl Reporter {
    pub fn new(trace: Box<dyn Write + Send>, summary: Box<dyn Write + Send>, format: SummaryFormat) -> Self {
        Reporter {
            trace: Mutex::new(trace),
            summary: Mutex::new(summary),
            format,
        }
    }

    // Text mode: everything on stdout. JSON mode: only the JSON on stdout.
    pub fn stdout(format: SummaryFormat) -> Self {
        let trace: Box<dyn Write + Send> = match format {
            SummaryFormat::Text => Box::new(io::stdout()),
            SummaryFormat::Json => Box::new(io::stderr()),
        };
        Reporter::new(trace, Box::new(io::stdout()), format)
    }

    pub fn checking(&self, page: &str) {
        self.trace_line(format_args!("\nChecking links on {}", page));
    }

    pub fn seen(&self, url: &str) {
        self.trace_line(format_args!("{:<70} [SEEN, SKIPPING]", url));
    }

    pub fn no_links(&self) {
        self.trace_line(format_args!("No links to check"));
    }

    // One line per probed link: [OK], [ERROR: Status n] or [ERROR: message]
    pub fn link(&self, record: &LinkRecord) {
        let url = record.url.as_str();
        match &record.error {
            Some(error) => self.trace_line(format_args!("{:<70} [ERROR: {}]", url, error)),
            None if record.status_code != 200 => {
                self.trace_line(format_args!("{:<70} [ERROR: Status {}]", url, record.status_code))
            }
            None => self.trace_line(format_args!("{:<70} [OK]", url)),
        }
    }

    pub fn summary(&self, summary: &Summary) {
        match self.format {
            SummaryFormat::Text => self.text_summary(summary),
            SummaryFormat::Json => match serde_json::to_string_pretty(summary) {
                Ok(json) => self.summary_line(format_args!("{}", json)),
                Err(e) => warn!(error = %e, "failed to serialize summary"),
            },
        }
    }

    fn text_summary(&self, summary: &Summary) {
        if summary.problematic == 0 {
            self.summary_line(format_args!("\nNo broken links found!"));
            return;
        }

        self.summary_line(format_args!(
            "\n=== Summary of All Problematic Links ({}) ===",
            summary.problematic
        ));
        for record in &summary.links {
            let url = record.url.as_str();
            match &record.error {
                Some(error) => self.summary_line(format_args!(
                    "{:<70} [ERROR: {}] (found on {})",
                    url, error, record.parent
                )),
                None => self.summary_line(format_args!(
                    "{:<70} [Status: {}] (found on {})",
                    url, record.status_code, record.parent
                )),
            }
        }
    }

    fn trace_line(&self, line: fmt::Arguments<'_>) {
        write_line(&self.trace, line);
    }

    fn summary_line(&self, line: fmt::Arguments<'_>) {
        write_line(&self.summary, line);
    }
}

// A closed stdout (e.g. `weasel ... | head`) shouldn't abort the crawl
fn write_line(sink: &Sink, line: fmt::Arguments<'_>) {
    let mut out = sink.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        warn!(error = %e, "failed to write report line");
    }
}

// In-memory sink for tests: every clone writes into the same buffer
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub(crate) fn reporter(&self, format: SummaryFormat) -> Reporter {
        Reporter::new(Box::new(self.clone()), Box::new(self.clone()), format)
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
