//! Function key: the (file, line, function) triple that identifies one
//! profiling record.
//!
//! Keys are unique by construction, one entry per distinct code location.
//! We derive ordering so the key can index a BTreeMap.

use std::fmt;

/// Pseudo file path the profiler records for built-in functions.
pub const BUILTIN_FILE: &str = "~";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuncKey {
    pub file: String,
    pub line: u32,
    pub name: String,
}

impl FuncKey {
    pub fn new(file: impl Into<String>, line: u32, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            name: name.into(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.file == BUILTIN_FILE && self.line == 0
    }
}

impl fmt::Display for FuncKey {
    /// `path:line(function)`, or the bare name for built-ins.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_builtin() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}({})", self.file, self.line, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_regular_and_builtin() {
        let key = FuncKey::new("pkg/a.py", 10, "f");
        assert_eq!(key.to_string(), "pkg/a.py:10(f)");

        let builtin = FuncKey::new(BUILTIN_FILE, 0, "{built-in method builtins.len}");
        assert!(builtin.is_builtin());
        assert_eq!(builtin.to_string(), "{built-in method builtins.len}");
    }

    #[test]
    fn ordering_is_file_then_line_then_name() {
        let mut keys = vec![
            FuncKey::new("b.py", 1, "a"),
            FuncKey::new("a.py", 9, "z"),
            FuncKey::new("a.py", 9, "a"),
            FuncKey::new("a.py", 2, "m"),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                FuncKey::new("a.py", 2, "m"),
                FuncKey::new("a.py", 9, "a"),
                FuncKey::new("a.py", 9, "z"),
                FuncKey::new("b.py", 1, "a"),
            ]
        );
    }
}
