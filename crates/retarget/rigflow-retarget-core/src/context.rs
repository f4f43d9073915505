//! Explicit evaluation context replacing ambient scene state.
//!
//! Operations that move the clock take the context and wrap themselves in a
//! [`ContextScope`], which snapshots on entry and restores on drop, including
//! on error paths.

/// Transient scene state the engine touches: the evaluation clock.
#[derive(Clone, Debug)]
pub struct EvaluationContext {
    frame: i32,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self { frame: 1 }
    }

    #[inline]
    pub fn frame(&self) -> i32 {
        self.frame
    }

    #[inline]
    pub fn set_frame(&mut self, frame: i32) {
        self.frame = frame;
    }

    /// Scoped acquisition: the returned guard restores the current frame when
    /// it goes out of scope.
    pub fn scope(&mut self) -> ContextScope<'_> {
        let saved_frame = self.frame;
        ContextScope {
            ctx: self,
            saved_frame,
        }
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ContextScope<'a> {
    ctx: &'a mut EvaluationContext,
    saved_frame: i32,
}

impl std::ops::Deref for ContextScope<'_> {
    type Target = EvaluationContext;

    fn deref(&self) -> &EvaluationContext {
        self.ctx
    }
}

impl std::ops::DerefMut for ContextScope<'_> {
    fn deref_mut(&mut self) -> &mut EvaluationContext {
        self.ctx
    }
}

impl Drop for ContextScope<'_> {
    fn drop(&mut self) {
        self.ctx.frame = self.saved_frame;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_restores_frame_on_drop() {
        let mut ctx = EvaluationContext::new();
        ctx.set_frame(42);
        {
            let mut scope = ctx.scope();
            scope.set_frame(100);
            assert_eq!(scope.frame(), 100);
        }
        assert_eq!(ctx.frame(), 42);
    }
}
