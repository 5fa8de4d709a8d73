//! Composable eligibility predicates.
//!
//! A [`Specification`] answers one yes/no question about a candidate.
//! [`and`](Specification::and), [`or`](Specification::or) and
//! [`not`](Specification::not) wrap their operands into a new immutable
//! tree; evaluation walks that tree top-down and never touches the
//! candidate's state.

/// AND / OR / NOT nodes and closure-backed leaves.
pub mod combinators;
/// Vehicle predicates: readiness, engine, capacity, refrigeration, efficiency.
pub mod vehicle;

pub use combinators::{AndSpecification, FnSpecification, NotSpecification, OrSpecification, predicate};
pub use vehicle::{
    FuelEfficiency, HasEngineType, HasStatus, MinCargoCapacity, MinPassengerCapacity,
    OperationalReadiness, Refrigeration, Versatile,
};

use std::sync::Arc;

/// A boolean predicate over `Self::Candidate`.
pub trait Specification: Send + Sync {
    type Candidate: ?Sized;

    fn is_satisfied_by(&self, candidate: &Self::Candidate) -> bool;

    /// Satisfied iff both `self` and `other` are.
    fn and<S>(self, other: S) -> AndSpecification<Self, S>
    where
        Self: Sized,
        S: Specification<Candidate = Self::Candidate>,
    {
        AndSpecification::new(self, other)
    }

    /// Satisfied iff at least one of `self` and `other` is.
    fn or<S>(self, other: S) -> OrSpecification<Self, S>
    where
        Self: Sized,
        S: Specification<Candidate = Self::Candidate>,
    {
        OrSpecification::new(self, other)
    }

    /// Satisfied iff `self` is not.
    fn not(self) -> NotSpecification<Self>
    where
        Self: Sized,
    {
        NotSpecification::new(self)
    }

    /// Erase the concrete tree type, e.g. to build a filter at runtime.
    fn boxed(self) -> BoxedSpecification<Self::Candidate>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

pub type BoxedSpecification<T> = Box<dyn Specification<Candidate = T>>;

impl<S: Specification + ?Sized> Specification for Box<S> {
    type Candidate = S::Candidate;

    fn is_satisfied_by(&self, candidate: &Self::Candidate) -> bool {
        (**self).is_satisfied_by(candidate)
    }
}

impl<S: Specification + ?Sized> Specification for Arc<S> {
    type Candidate = S::Candidate;

    fn is_satisfied_by(&self, candidate: &Self::Candidate) -> bool {
        (**self).is_satisfied_by(candidate)
    }
}

impl<S: Specification + ?Sized> Specification for &S {
    type Candidate = S::Candidate;

    fn is_satisfied_by(&self, candidate: &Self::Candidate) -> bool {
        (**self).is_satisfied_by(candidate)
    }
}
