//! Circular dependency and depth detection.
//!
//! Every top-level `get` or `call` creates one [`ResolutionContext`] and threads it
//! through all nested resolutions. Two independent top-level calls never share a
//! stack, so concurrent resolutions on different threads cannot see each other's
//! in-flight identifiers.

use smallvec::SmallVec;

use crate::error::{ContainerError, DiResult};

/// The stack of identifiers currently being resolved.
#[derive(Debug)]
pub(crate) struct ResolutionContext {
    stack: SmallVec<[String; 16]>,
    max_depth: usize,
}

impl ResolutionContext {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            stack: SmallVec::new(),
            max_depth,
        }
    }

    /// Number of identifiers currently in flight.
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Runs `f` with `id` pushed on the stack.
    ///
    /// Fails before pushing when `id` is already in flight (a cycle) or when the
    /// stack already holds `max_depth` entries. The entry is popped on every exit
    /// path of `f`, success or error.
    pub(crate) fn within<T, F>(&mut self, id: &str, f: F) -> DiResult<T>
    where
        F: FnOnce(&mut Self) -> DiResult<T>,
    {
        // Circular detection BEFORE pushing the new id
        if self.stack.iter().any(|n| n == id) {
            let mut path: Vec<String> = self.stack.iter().cloned().collect();
            path.push(id.to_string());
            return Err(ContainerError::Circular(path).into());
        }

        // Depth guard
        if self.stack.len() >= self.max_depth {
            let mut path: Vec<String> = self.stack.iter().cloned().collect();
            path.push(id.to_string());
            return Err(ContainerError::DepthExceeded {
                limit: self.max_depth,
                path,
            }
            .into());
        }

        self.stack.push(id.to_string());
        let result = f(self);
        let popped = self.stack.pop();
        debug_assert_eq!(popped.as_deref(), Some(id));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;

    #[test]
    fn test_cycle_reports_full_path() {
        let mut ctx = ResolutionContext::new(15);
        let err = ctx
            .within("a", |ctx| ctx.within("b", |ctx| ctx.within("a", |_| Ok(()))))
            .unwrap_err();
        match err {
            DiError::Container(ContainerError::Circular(path)) => {
                assert_eq!(path, vec!["a", "b", "a"]);
            }
            other => panic!("expected circular error, got {:?}", other),
        }
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_depth_limit_counts_in_flight_entries() {
        let mut ctx = ResolutionContext::new(2);
        assert!(ctx.within("a", |ctx| ctx.within("b", |_| Ok(()))).is_ok());

        let err = ctx
            .within("a", |ctx| ctx.within("b", |ctx| ctx.within("c", |_| Ok(()))))
            .unwrap_err();
        assert!(matches!(
            err,
            DiError::Container(ContainerError::DepthExceeded { limit: 2, .. })
        ));
    }

    #[test]
    fn test_stack_unwinds_after_error() {
        let mut ctx = ResolutionContext::new(15);
        let result: DiResult<()> = ctx.within("a", |_| Err(DiError::NotFound("x".into())));
        assert!(result.is_err());
        assert_eq!(ctx.depth(), 0);
        // the same id can be resolved again afterwards
        assert!(ctx.within("a", |_| Ok(())).is_ok());
    }
}
