use super::*;
use std::env;
use std::fs;
use std::path::Path;

use crate::value::ErrorKind;

impl Interpreter {
    /// Resolve `$CHARLYDIR/src/std/prelude.charly` and execute it in the
    /// top scope.
    pub fn load_prelude(&mut self) -> Result<(), RuntimeError> {
        let dir = env::var("CHARLYDIR").map_err(|_| {
            RuntimeError::with_kind(
                ErrorKind::PreludeMissing,
                "CHARLYDIR is not set; cannot locate the prelude",
            )
        })?;
        let path = Path::new(&dir)
            .join("src")
            .join("std")
            .join("prelude.charly");
        let path = path.canonicalize().map_err(|err| {
            RuntimeError::with_kind(
                ErrorKind::PreludeMissing,
                format!("Cannot resolve prelude at {}: {}", path.display(), err),
            )
        })?;
        self.load_prelude_from(&path)
    }

    /// Execute a prelude file against the existing top scope. Parse and
    /// runtime failures propagate; an unreadable file is `PreludeMissing`.
    pub fn load_prelude_from(&mut self, path: &Path) -> Result<(), RuntimeError> {
        crate::trace::trace_stage!(Prelude, "loading {}", path.display());
        let source = fs::read_to_string(path).map_err(|err| {
            RuntimeError::with_kind(
                ErrorKind::PreludeMissing,
                format!("Cannot read prelude at {}: {}", path.display(), err),
            )
        })?;
        let program = self.parse(&path.display().to_string(), &source)?;
        let top = self.top.clone();
        self.exec_program(&program, &top)?;
        Ok(())
    }
}
