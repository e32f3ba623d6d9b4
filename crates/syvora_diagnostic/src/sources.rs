use std::fmt;

use unicode_width::UnicodeWidthStr;

const TAB: &str = "    ";

/// A named source text with a cached line index.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    text: String,
    line_breaks: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_breaks = text
            .char_indices()
            .filter_map(|(i, ch)| (ch == '\n').then_some(i))
            .collect();

        Self {
            name: name.into(),
            text,
            line_breaks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based line and character column of a byte offset.
    pub fn byte_to_line_col(&self, byte: usize) -> Option<(usize, usize)> {
        let line = self.byte_to_line_index(byte)?;
        let line_start = self.line_to_byte(line)?;
        let col = self.text.get(line_start..byte)?.chars().count();

        Some((line + 1, col + 1))
    }

    pub fn byte_to_line_index(&self, byte: usize) -> Option<usize> {
        if byte > self.text.len() {
            return None;
        }

        match self.line_breaks.binary_search(&byte) {
            Ok(line) | Err(line) => Some(line),
        }
    }

    pub fn line_to_byte(&self, line: usize) -> Option<usize> {
        if line == 0 {
            Some(0)
        } else {
            self.line_breaks.get(line - 1).map(|&byte| byte + 1)
        }
    }

    /// Text of a 0-based line, without its line terminator.
    pub fn line_str(&self, index: usize) -> Option<&str> {
        let start = self.line_to_byte(index)?;
        let end = self.line_to_byte(index + 1).unwrap_or(self.text.len());

        let s = &self.text[start..end];
        let s = s.strip_suffix('\n').unwrap_or(s);
        let s = s.strip_suffix('\r').unwrap_or(s);

        Some(s)
    }

    pub fn num_lines(&self) -> usize {
        1 + self.line_breaks.len()
    }

    /// Excerpt of a 1-based line with a caret under a 1-based character column.
    pub fn excerpt(&self, line: usize, column: usize) -> Excerpt {
        let line_str = line
            .checked_sub(1)
            .and_then(|index| self.line_str(index))
            .unwrap_or_default();

        let before: String = line_str.chars().take(column.saturating_sub(1)).collect();

        Excerpt {
            line: line_str.replace('\t', TAB),
            caret_offset: before.replace('\t', TAB).width(),
        }
    }
}

/// A single source line and the display offset of the caret below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    pub line: String,
    pub caret_offset: usize,
}

impl fmt::Display for Excerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.line)?;
        write!(f, "{:offset$}^", "", offset = self.caret_offset)
    }
}
