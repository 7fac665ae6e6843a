//! Indentation-aware text buffer for emitting Rust source.

const INDENT: &str = "    ";

/// Accumulates generated source one line at a time.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    /// Empty buffer at depth zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current depth.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    /// Writes an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Writes `text` and indents what follows.
    pub fn open(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.line(text);
        self.depth += 1;
        self
    }

    /// Dedents and writes `text`.
    pub fn close(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(text)
    }

    /// Dedents, writes `text` and indents again (`} else {`).
    pub fn reopen(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.open(text)
    }

    /// Writes `///` lines; nothing for empty text.
    pub fn doc(&mut self, text: &str) -> &mut Self {
        for line in text.trim().lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(format!("/// {line}"));
            }
        }
        self
    }

    /// Consumes the writer.
    pub fn finish(self) -> String {
        self.buf
    }
}
