//! Engine and compilation options.
//!
//! Options come in pairs: a complete struct with defaults, and an override
//! struct whose `None` fields leave the defaults alone.

/// Options fixed when the engine is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Used by every compilation unless overridden per call.
    pub default_compile_options: CompileOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Upper bound on worklist passes while building the tree.
    ///
    /// Well-formed input needs a handful of passes per operator; the bound
    /// turns a malformed expression that never settles into an error.
    pub max_worklist_passes: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_worklist_passes: 100_000,
        }
    }
}

impl CompileOptions {
    pub fn override_with(&mut self, overrides: &CompileOptionsOverride) {
        if let Some(max) = overrides.max_worklist_passes {
            self.max_worklist_passes = max;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptionsOverride {
    pub max_worklist_passes: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_only_touches_set_fields() {
        let mut options = CompileOptions::default();
        options.override_with(&CompileOptionsOverride::default());
        assert_eq!(options.max_worklist_passes, 100_000);

        options.override_with(&CompileOptionsOverride {
            max_worklist_passes: Some(8),
        });
        assert_eq!(options.max_worklist_passes, 8);
    }
}
