pub mod analyze;
pub mod batch;
pub mod patterns;
pub mod split;

use crate::PatternArgs;
use legalsplit_core::error::SplitError;
use legalsplit_core::patterns::{builtin, load_patterns, PatternSet};

/// Resolve `--preset` / `--patterns` into a compiled table. A custom file
/// wins; with neither given the default preset is used.
pub fn load_pattern_set(args: &PatternArgs) -> Result<PatternSet, SplitError> {
    match (&args.patterns, &args.preset) {
        (Some(path), _) => load_patterns(path),
        (None, Some(name)) => builtin::load_preset(name),
        (None, None) => builtin::load_preset(builtin::DEFAULT_PRESET),
    }
}
