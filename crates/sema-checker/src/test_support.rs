//! Fixture helpers shared by this crate's own tests and by downstream crates that want
//! to exercise `Checker` against a hand-built `File` (`sema_ast::builder::FileBuilder`)
//! without repeating the same `CheckerOptions`/`Checker::new` boilerplate.

use crate::checker::Checker;
use crate::options::CheckerOptions;
use crate::result::CheckResult;
use sema_ast::File;

/// `CheckerOptions` tuned for tests: alien-syntax hints off (tests build files that
/// never came from a real dialect classifier) and depth limits left at their defaults.
pub fn test_options() -> CheckerOptions {
    CheckerOptions {
        alien_hints: false,
        ..CheckerOptions::default()
    }
}

/// Run a fresh `Checker` over `file` with `test_options()`.
pub fn check(file: &File) -> CheckResult {
    Checker::new(test_options()).check_file(file)
}
