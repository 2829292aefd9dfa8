/// How much of a file to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Package clause, imports and every top-level declaration.
    #[default]
    Full,
    /// Stop after the import declarations.
    ImportsOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub mode: Mode,
    /// Postfix operators (selectors, calls, index/slice, literal bodies)
    /// allowed in one primary expression.
    pub max_postfix_chain: usize,
    /// Recursion limit for nested expressions, types and statements.
    pub max_nesting: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Full,
            max_postfix_chain: 100,
            max_nesting: 256,
        }
    }
}

impl ParserConfig {
    pub fn imports_only(mut self) -> Self {
        self.mode = Mode::ImportsOnly;
        self
    }

    pub fn with_max_postfix_chain(mut self, n: usize) -> Self {
        self.max_postfix_chain = n;
        self
    }

    pub fn with_max_nesting(mut self, n: usize) -> Self {
        self.max_nesting = n;
        self
    }
}
