use serde::Serialize;
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

/// Represents a byte range in the source buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourceSpan {
    pub start: u32,
    pub end: u32,
}

impl SourceSpan {
    pub fn new(start: u32, end: u32) -> Self {
        assert!(start <= end, "span end before start");
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Debug for SourceSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceSpan({}..{})", self.start, self.end)
    }
}

/// Represents a single loaded source file with precomputed line positions.
#[derive(Clone)]
pub struct SourceFile {
    pub name: PathBuf,
    pub content: String,
    pub line_starts: Vec<u32>, // offset of each lines
}

impl SourceFile {
    pub fn new(name: impl Into<PathBuf>, content: String) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            name: name.into(),
            content,
            line_starts,
        }
    }

    pub fn lookup_line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(l) => l,
            Err(next) => next.saturating_sub(1),
        };
        let col = offset - self.line_starts[line];
        (line as u32 + 1, col + 1)
    }

    /// Text of the line containing `offset`, without its terminating newline.
    pub fn line_text(&self, offset: u32) -> &str {
        let (line, _) = self.lookup_line_col(offset);
        let begin = self.line_starts[line as usize - 1] as usize;
        let end = self.content[begin..]
            .find('\n')
            .map_or(self.content.len(), |n| begin + n);
        &self.content[begin..end]
    }

    /// Whether `span` lies inside this buffer.
    pub fn contains(&self, span: SourceSpan) -> bool {
        (span.end as usize) <= self.content.len()
    }
}
