use crate::constants::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Deepest container nesting the validator will follow.
    pub max_depth: usize,
    /// Accept (and strip) a single NUL terminator at the end of the input.
    pub allow_trailing_nul: bool,
    pub max_input_len: Option<usize>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trailing_nul(mut self, allow: bool) -> Self {
        self.allow_trailing_nul = allow;
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: Option<usize>) -> Self {
        self.max_input_len = max_input_len;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_nul: true,
            max_input_len: None,
        }
    }
}
