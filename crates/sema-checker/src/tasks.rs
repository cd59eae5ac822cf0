//! Task Lifetime Tracker (C7, §4.7): detects unawaited tasks, task-container drainage,
//! and cross-scope escape for structured-concurrency bindings.

use rustc_hash::FxHashMap;
use sema_ast::symbols::SymbolId;
use sema_common::{Diagnostic, DiagnosticCode, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Live,
    Awaited,
    Returned,
    Passed,
    Moved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerSafety {
    /// An array of `Task<T>` — safe to hold pending across an `await` point.
    SuspendSafe,
    /// A generic struct (or other non-array) holding a `Task<T>` — not safe.
    Unsafe,
}

#[derive(Default)]
pub struct TaskTracker {
    tasks: FxHashMap<SymbolId, TaskState>,
    birth_span: FxHashMap<SymbolId, Span>,
    /// Task-container bindings (§3 "Task info") and whether they are currently pending.
    containers: FxHashMap<SymbolId, bool>,
    container_safety: FxHashMap<SymbolId, ContainerSafety>,
    /// Bindings inside an active drain loop, suppressing the pending/await-crossing
    /// check for that container until the loop is exited.
    draining: FxHashMap<SymbolId, bool>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn birth(&mut self, binding: SymbolId, span: Span) {
        self.tasks.insert(binding, TaskState::Live);
        self.birth_span.insert(binding, span);
    }

    pub fn mark_awaited(&mut self, binding: SymbolId) {
        self.tasks.insert(binding, TaskState::Awaited);
    }

    pub fn mark_returned(&mut self, binding: SymbolId) {
        self.tasks.insert(binding, TaskState::Returned);
    }

    pub fn mark_passed(&mut self, binding: SymbolId) {
        self.tasks.insert(binding, TaskState::Passed);
    }

    pub fn mark_moved(&mut self, binding: SymbolId) {
        self.tasks.insert(binding, TaskState::Moved);
    }

    pub fn state(&self, binding: SymbolId) -> Option<TaskState> {
        self.tasks.get(&binding).copied()
    }

    /// Module-level `let` of a task is always an escape — there is no enclosing scope
    /// for it to be awaited in before the module outlives the task (§4.7 "Task escape").
    pub fn check_module_level_birth(&self, span: Span) -> Diagnostic {
        Diagnostic::new(
            DiagnosticCode::SemaTaskEscapesScope,
            span,
            "a task cannot be bound at module scope".to_string(),
        )
    }

    pub fn register_container(&mut self, binding: SymbolId, safety: ContainerSafety) {
        self.containers.insert(binding, false);
        self.container_safety.insert(binding, safety);
    }

    pub fn mark_container_pending(&mut self, binding: SymbolId) {
        if let Some(pending) = self.containers.get_mut(&binding) {
            *pending = true;
        }
    }

    pub fn mark_container_drained(&mut self, binding: SymbolId) {
        if let Some(pending) = self.containers.get_mut(&binding) {
            *pending = false;
        }
    }

    pub fn enter_drain_loop(&mut self, binding: SymbolId) {
        self.draining.insert(binding, true);
    }

    pub fn exit_drain_loop(&mut self, binding: SymbolId) {
        self.draining.remove(&binding);
    }

    pub fn is_draining(&self, binding: SymbolId) -> bool {
        self.draining.get(&binding).copied().unwrap_or(false)
    }

    /// Crossing an `await` point with a pending, non-suspend-safe container that isn't
    /// currently being drained is an error (§4.7).
    pub fn check_await_point(&self, span: Span) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for (&binding, &pending) in &self.containers {
            if !pending || self.is_draining(binding) {
                continue;
            }
            if self.container_safety.get(&binding) == Some(&ContainerSafety::SuspendSafe) {
                continue;
            }
            diags.push(Diagnostic::new(
                DiagnosticCode::SemaTaskLifetimeError,
                span,
                "a pending task container cannot cross an await point here".to_string(),
            ));
        }
        diags
    }

    /// At scope exit: any `Live` task is unawaited; any still-pending container (not
    /// suspend-safe, not mid-drain) is unconsumed (§4.7).
    pub fn check_scope_exit(&self, bindings_in_scope: &[SymbolId]) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for &binding in bindings_in_scope {
            if self.tasks.get(&binding) == Some(&TaskState::Live) {
                let span = self.birth_span.get(&binding).copied().unwrap_or(Span::DUMMY);
                diags.push(Diagnostic::new(
                    DiagnosticCode::SemaTaskNotAwaited,
                    span,
                    "task is never awaited, returned, or passed before going out of scope".to_string(),
                ));
            }
            if self.containers.get(&binding) == Some(&true) {
                diags.push(Diagnostic::new(
                    DiagnosticCode::SemaTaskContainerUnconsumed,
                    Span::DUMMY,
                    "task container still has pending tasks at scope exit".to_string(),
                ));
            }
        }
        diags
    }

    /// Recognizes the drain-loop shape named in §4.7: a loop condition of the form
    /// `container.__len() > 0` (or `>= 1`, `!= 0`) whose body consumes exactly via
    /// `container.pop()`.
    pub fn is_drain_loop_condition(len_comparison: DrainCondition) -> bool {
        matches!(
            len_comparison,
            DrainCondition::GreaterThanZero | DrainCondition::GreaterOrEqualOne | DrainCondition::NotEqualZero
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainCondition {
    GreaterThanZero,
    GreaterOrEqualOne,
    NotEqualZero,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_task_at_scope_exit_is_not_awaited() {
        let mut tracker = TaskTracker::new();
        let t = SymbolId(1);
        tracker.birth(t, Span::new(0, 1));
        let diags = tracker.check_scope_exit(&[t]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::SemaTaskNotAwaited);
    }

    #[test]
    fn awaited_task_is_silent_at_scope_exit() {
        let mut tracker = TaskTracker::new();
        let t = SymbolId(1);
        tracker.birth(t, Span::new(0, 1));
        tracker.mark_awaited(t);
        let diags = tracker.check_scope_exit(&[t]);
        assert!(diags.is_empty());
    }

    #[test]
    fn pending_unsafe_container_blocks_await_point() {
        let mut tracker = TaskTracker::new();
        let c = SymbolId(2);
        tracker.register_container(c, ContainerSafety::Unsafe);
        tracker.mark_container_pending(c);
        let diags = tracker.check_await_point(Span::new(5, 6));
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn draining_container_is_allowed_across_await() {
        let mut tracker = TaskTracker::new();
        let c = SymbolId(2);
        tracker.register_container(c, ContainerSafety::Unsafe);
        tracker.mark_container_pending(c);
        tracker.enter_drain_loop(c);
        let diags = tracker.check_await_point(Span::new(5, 6));
        assert!(diags.is_empty());
    }

    #[test]
    fn suspend_safe_container_is_allowed_across_await() {
        let mut tracker = TaskTracker::new();
        let c = SymbolId(3);
        tracker.register_container(c, ContainerSafety::SuspendSafe);
        tracker.mark_container_pending(c);
        let diags = tracker.check_await_point(Span::new(5, 6));
        assert!(diags.is_empty());
    }

    #[test]
    fn unconsumed_container_is_reported_at_scope_exit() {
        let mut tracker = TaskTracker::new();
        let c = SymbolId(4);
        tracker.register_container(c, ContainerSafety::Unsafe);
        tracker.mark_container_pending(c);
        let diags = tracker.check_scope_exit(&[c]);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::SemaTaskContainerUnconsumed));
    }
}
