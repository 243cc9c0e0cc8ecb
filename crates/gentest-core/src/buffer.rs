//! Emission buffer: an indentation-aware line sink.
//!
//! One buffer per output file, plus one child buffer per test case started
//! at the file's current depth. A child is merged back only when its
//! indentation is balanced, so a broken test never leaks half a block into
//! the file.

use crate::value::ValueError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmitError {
    #[error("pop_indent below base depth {base}")]
    IndentUnderflow { base: usize },

    #[error("unbalanced indentation: depth {depth}, expected {base}")]
    UnbalancedIndent { depth: usize, base: usize },

    #[error(transparent)]
    Value(#[from] ValueError),
}

#[derive(Debug, Clone)]
pub struct EmitBuffer {
    lines: Vec<String>,
    depth: usize,
    base: usize,
    unit: &'static str,
}

impl EmitBuffer {
    /// Empty buffer indenting with `unit` per level.
    #[must_use]
    pub fn new(unit: &'static str) -> Self {
        Self {
            lines: Vec::new(),
            depth: 0,
            base: 0,
            unit,
        }
    }

    /// Fresh buffer whose base depth is this buffer's current depth.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            lines: Vec::new(),
            depth: self.depth,
            base: self.depth,
            unit: self.unit,
        }
    }

    /// Append one line at the current indentation. Empty lines stay empty.
    pub fn push_line(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        if line.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines
                .push(format!("{}{line}", self.unit.repeat(self.depth)));
        }
    }

    pub fn push_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        for line in lines {
            self.push_line(line);
        }
    }

    pub fn push_indent(&mut self) {
        self.depth += 1;
    }

    pub fn pop_indent(&mut self) -> Result<(), EmitError> {
        if self.depth == self.base {
            return Err(EmitError::IndentUnderflow { base: self.base });
        }
        self.depth -= 1;
        Ok(())
    }

    fn check_balanced(&self) -> Result<(), EmitError> {
        if self.depth != self.base {
            return Err(EmitError::UnbalancedIndent {
                depth: self.depth,
                base: self.base,
            });
        }
        Ok(())
    }

    /// Merge a finished child buffer. Fails if the child is not back at its base depth.
    pub fn append(&mut self, child: EmitBuffer) -> Result<(), EmitError> {
        child.check_balanced()?;
        self.lines.extend(child.lines);
        Ok(())
    }

    /// Join all lines with `\n` and a trailing newline.
    pub fn flatten(self) -> Result<String, EmitError> {
        self.check_balanced()?;
        let mut out = self.lines.join("\n");
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indents_nested_lines() {
        let mut buf = EmitBuffer::new("  ");
        buf.push_line("a {");
        buf.push_indent();
        buf.push_lines(&["b", "", "c"]);
        buf.pop_indent().unwrap();
        buf.push_line("}");
        assert_eq!(buf.flatten().unwrap(), "a {\n  b\n\n  c\n}\n");
    }

    #[test]
    fn pop_below_base_fails() {
        let mut buf = EmitBuffer::new("  ");
        assert_eq!(buf.pop_indent(), Err(EmitError::IndentUnderflow { base: 0 }));

        buf.push_indent();
        let mut child = buf.child();
        assert_eq!(child.pop_indent(), Err(EmitError::IndentUnderflow { base: 1 }));
    }

    #[test]
    fn unbalanced_child_is_rejected() {
        let mut buf = EmitBuffer::new("    ");
        buf.push_indent();
        let mut child = buf.child();
        child.push_line("x");
        assert_eq!(child.lines, vec!["    x".to_string()]);
        child.push_indent();
        assert_eq!(
            buf.append(child),
            Err(EmitError::UnbalancedIndent { depth: 2, base: 1 })
        );
        assert!(buf.lines.is_empty());
    }

    #[test]
    fn flatten_requires_balance() {
        let mut buf = EmitBuffer::new("\t");
        buf.push_indent();
        assert!(buf.flatten().is_err());
    }
}
