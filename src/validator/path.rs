use super::{Check, Failure, check_none};
use crate::types::Value;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
enum PathRule {
    Suffix(Vec<String>),
    Exists,
    File,
    Dir,
}

impl PathRule {
    fn check(&self, path: &Path) -> Check {
        match self {
            PathRule::Suffix(suffixes) => {
                let ext = path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                if suffixes.iter().any(|s| *s == ext) {
                    Ok(())
                } else {
                    Err(Failure::new(format!(
                        "suffix of path not in {suffixes:?}: {}",
                        path.display()
                    )))
                }
            }
            PathRule::Exists => match path.try_exists() {
                Ok(true) => Ok(()),
                Ok(false) => Err(Failure::new(format!("path does not exist: {}", path.display()))),
                Err(e) => Err(Failure::new(format!("cannot access {}: {e}", path.display()))),
            },
            PathRule::File if path.is_file() => Ok(()),
            PathRule::File => Err(Failure::new(format!("path is not a file: {}", path.display()))),
            PathRule::Dir if path.is_dir() => Ok(()),
            PathRule::Dir => Err(Failure::new(format!("path is not a directory: {}", path.display()))),
        }
    }
}

/// The only validator family that touches the filesystem. I/O errors are
/// reported as plain failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathValidator {
    rules: Vec<PathRule>,
    allow_none: bool,
}

impl PathValidator {
    /// Accepted extensions, written with or without the leading dot.
    pub fn is_suffix<S: AsRef<str>>(mut self, suffixes: impl IntoIterator<Item = S>) -> Self {
        let suffixes = suffixes
            .into_iter()
            .map(|s| {
                let s = s.as_ref();
                if s.starts_with('.') {
                    s.to_string()
                } else {
                    format!(".{s}")
                }
            })
            .collect();
        self.rules.push(PathRule::Suffix(suffixes));
        self
    }

    pub fn is_exists(mut self) -> Self {
        self.rules.push(PathRule::Exists);
        self
    }

    pub fn is_file(mut self) -> Self {
        self.rules.push(PathRule::File);
        self
    }

    pub fn is_dir(mut self) -> Self {
        self.rules.push(PathRule::Dir);
        self
    }

    pub fn optional(mut self) -> Self {
        self.allow_none = true;
        self
    }

    pub fn check(&self, value: &Value) -> Check {
        if let Some(result) = check_none(value, self.allow_none) {
            return result;
        }
        let Some(path) = value.as_path() else {
            return Err(Failure::type_mismatch(format!("not instance of path : {value}")));
        };
        self.rules.iter().try_for_each(|rule| rule.check(path))
    }
}
