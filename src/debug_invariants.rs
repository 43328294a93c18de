use crate::lattice_error::LatticeError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), LatticeError>;
}

/// Runs a fallible check and panics on error when invariant checking is
/// enabled; compiles to nothing otherwise.
#[macro_export]
macro_rules! debug_assert_ok {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[lattice invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
