use std::fmt;
use std::marker::PhantomData;

use super::Specification;

#[derive(Debug, Clone, Copy)]
pub struct AndSpecification<A, B> {
    left: A,
    right: B,
}

impl<A, B> AndSpecification<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<A, B> Specification for AndSpecification<A, B>
where
    A: Specification,
    B: Specification<Candidate = A::Candidate>,
{
    type Candidate = A::Candidate;

    fn is_satisfied_by(&self, candidate: &Self::Candidate) -> bool {
        self.left.is_satisfied_by(candidate) && self.right.is_satisfied_by(candidate)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrSpecification<A, B> {
    left: A,
    right: B,
}

impl<A, B> OrSpecification<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<A, B> Specification for OrSpecification<A, B>
where
    A: Specification,
    B: Specification<Candidate = A::Candidate>,
{
    type Candidate = A::Candidate;

    fn is_satisfied_by(&self, candidate: &Self::Candidate) -> bool {
        self.left.is_satisfied_by(candidate) || self.right.is_satisfied_by(candidate)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NotSpecification<S> {
    inner: S,
}

impl<S> NotSpecification<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// The negated operand.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Specification> Specification for NotSpecification<S> {
    type Candidate = S::Candidate;

    fn is_satisfied_by(&self, candidate: &Self::Candidate) -> bool {
        !self.inner.is_satisfied_by(candidate)
    }
}

/// Leaf built from a closure.
pub struct FnSpecification<T: ?Sized, F> {
    test: F,
    _candidate: PhantomData<fn(&T)>,
}

impl<T: ?Sized, F: Clone> Clone for FnSpecification<T, F> {
    fn clone(&self) -> Self {
        Self {
            test: self.test.clone(),
            _candidate: PhantomData,
        }
    }
}

impl<T: ?Sized, F: Copy> Copy for FnSpecification<T, F> {}

impl<T: ?Sized, F> fmt::Debug for FnSpecification<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSpecification")
    }
}

/// Wrap an attribute test as a specification.
pub fn predicate<T: ?Sized, F>(test: F) -> FnSpecification<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    FnSpecification {
        test,
        _candidate: PhantomData,
    }
}

impl<T: ?Sized, F> Specification for FnSpecification<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    type Candidate = T;

    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.test)(candidate)
    }
}
