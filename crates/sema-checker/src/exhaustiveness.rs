//! Pattern-match exhaustiveness over union subjects (§4.3 "Compare expressions"):
//! tracks which union members a `compare` expression's arms have covered, member by
//! member, and flags both missing coverage and a redundant `finally`.

use fixedbitset::FixedBitSet;
use sema_ast::Pattern;
use sema_common::{Diagnostic, DiagnosticCode, Span};
use sema_types::UnionInfo;

pub struct ExhaustivenessChecker<'a> {
    union: &'a UnionInfo,
    covered: FixedBitSet,
    seen_finally: Option<Span>,
}

impl<'a> ExhaustivenessChecker<'a> {
    pub fn new(union: &'a UnionInfo) -> Self {
        ExhaustivenessChecker {
            union,
            covered: FixedBitSet::with_capacity(union.members.len()),
            seen_finally: None,
        }
    }

    /// Record one arm's pattern. `member_index` is `None` for patterns that don't pin a
    /// specific member (a bare `Bind`, which only makes sense combined with a guard and
    /// never counts toward coverage on its own).
    pub fn record_arm(&mut self, pattern: &Pattern, span: Span) -> Option<Diagnostic> {
        match pattern {
            Pattern::Finally => {
                if let Some(first) = self.seen_finally {
                    return Some(
                        Diagnostic::new(
                            DiagnosticCode::SemaRedundantFinally,
                            span,
                            "this `finally` arm is unreachable; an earlier `finally` already covers every case".to_string(),
                        )
                        .with_note(first, "first `finally` arm is here"),
                    );
                }
                self.seen_finally = Some(span);
                for i in 0..self.union.members.len() {
                    self.covered.insert(i);
                }
                None
            }
            Pattern::Nothing => {
                self.mark_member_by(|m| matches!(m.kind, sema_types::UnionMemberKind::Nothing));
                None
            }
            Pattern::Tag { name, .. } => {
                let target = *name;
                self.mark_member_by(|m| m.name == Some(target));
                None
            }
            Pattern::Bind(_) | Pattern::Literal(_) | Pattern::Tuple(_) => None,
        }
    }

    fn mark_member_by(&mut self, pred: impl Fn(&sema_types::UnionMemberInfo) -> bool) {
        for (i, member) in self.union.members.iter().enumerate() {
            if pred(member) {
                self.covered.insert(i);
            }
        }
    }

    /// Members with no arm at all, once all arms have been recorded.
    pub fn missing_members(&self) -> Vec<&'a sema_types::UnionMemberInfo> {
        if self.seen_finally.is_some() {
            return Vec::new();
        }
        self.union
            .members
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.covered.contains(*i))
            .map(|(_, m)| m)
            .collect()
    }

    pub fn is_exhaustive(&self) -> bool {
        self.seen_finally.is_some() || self.covered.count_ones(..) == self.union.members.len()
    }

    pub fn finish(&self, subject_span: Span) -> Option<Diagnostic> {
        if self.is_exhaustive() {
            return None;
        }
        Some(Diagnostic::new(
            DiagnosticCode::SemaNonexhaustiveMatch,
            subject_span,
            format!("compare is not exhaustive: {} member(s) uncovered", self.missing_members().len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sema_common::Atom;
    use sema_types::{UnionMemberInfo, UnionMemberKind};

    fn sample_union() -> UnionInfo {
        UnionInfo {
            type_params: vec![],
            members: vec![
                UnionMemberInfo {
                    name: Some(Atom(1)),
                    kind: UnionMemberKind::Tag { payload_count: 0 },
                    payload_types: vec![],
                },
                UnionMemberInfo {
                    name: None,
                    kind: UnionMemberKind::Nothing,
                    payload_types: vec![],
                },
            ],
        }
    }

    #[test]
    fn uncovered_members_are_reported() {
        let union = sample_union();
        let checker = ExhaustivenessChecker::new(&union);
        assert!(!checker.is_exhaustive());
        assert_eq!(checker.missing_members().len(), 2);
    }

    #[test]
    fn covering_every_member_is_exhaustive() {
        let union = sample_union();
        let mut checker = ExhaustivenessChecker::new(&union);
        checker.record_arm(&Pattern::Tag { name: Atom(1), payload: vec![] }, Span::DUMMY);
        checker.record_arm(&Pattern::Nothing, Span::DUMMY);
        assert!(checker.is_exhaustive());
        assert!(checker.finish(Span::DUMMY).is_none());
    }

    #[test]
    fn finally_covers_everything_remaining() {
        let union = sample_union();
        let mut checker = ExhaustivenessChecker::new(&union);
        checker.record_arm(&Pattern::Finally, Span::DUMMY);
        assert!(checker.is_exhaustive());
    }

    #[test]
    fn second_finally_is_redundant() {
        let union = sample_union();
        let mut checker = ExhaustivenessChecker::new(&union);
        assert!(checker.record_arm(&Pattern::Finally, Span::new(0, 1)).is_none());
        let diag = checker.record_arm(&Pattern::Finally, Span::new(2, 3));
        assert!(diag.is_some());
        assert_eq!(diag.unwrap().code, DiagnosticCode::SemaRedundantFinally);
    }
}
