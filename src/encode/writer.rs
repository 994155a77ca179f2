use crate::num::number::format_number;

const INDENT_UNIT: &str = "  ";

pub(crate) struct Writer {
    buffer: String,
    indent_cache: Vec<String>,
}

impl Writer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_cache: vec![String::new()],
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn write_newline(&mut self) {
        self.buffer.push('\n');
    }

    pub fn write_indent(&mut self, depth: usize) {
        if depth == 0 {
            return;
        }
        if depth >= self.indent_cache.len() {
            self.extend_indent_cache(depth);
        }
        self.buffer.push_str(&self.indent_cache[depth]);
    }

    pub fn write_usize(&mut self, value: usize) {
        let mut buf = itoa::Buffer::new();
        self.buffer.push_str(buf.format(value));
    }

    pub fn write_number(&mut self, value: f64) {
        self.buffer.push_str(&format_number(value));
    }

    /// Write `label:` on its own indented line.
    pub fn write_label(&mut self, depth: usize, label: &str) {
        self.write_indent(depth);
        self.write_str(label);
        self.write_str(":");
        self.write_newline();
    }

    pub fn write_index_label(&mut self, depth: usize, index: usize) {
        self.write_indent(depth);
        self.write_usize(index);
        self.write_str(":");
        self.write_newline();
    }

    fn extend_indent_cache(&mut self, depth: usize) {
        while self.indent_cache.len() <= depth {
            let next = format!("{}{}", self.indent_cache[self.indent_cache.len() - 1], INDENT_UNIT);
            self.indent_cache.push(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_indent_cache_grows() {
        let mut writer = Writer::new();
        writer.write_indent(3);
        writer.write_str("x");
        writer.write_newline();
        writer.write_indent(1);
        writer.write_usize(42);
        assert_eq!(writer.finish(), "      x\n  42");
    }

    #[rstest::rstest]
    fn test_labels() {
        let mut writer = Writer::new();
        writer.write_label(1, "name");
        writer.write_index_label(2, 7);
        writer.write_number(2.5);
        assert_eq!(writer.finish(), "  name:\n    7:\n2.5");
    }
}
