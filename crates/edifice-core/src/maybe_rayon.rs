//! Rayon when the `threading` feature is on, a sequential stand-in otherwise.
//!
//! Call sites write `into_par_iter()` once. Without the feature the call
//! resolves to `into_iter()` and the rest of the chain uses `Iterator`.

#[cfg(feature = "threading")]
pub use rayon::prelude::*;

#[cfg(not(feature = "threading"))]
mod sequential {
    /// Sequential stand-in for `rayon::prelude::IntoParallelIterator`, so a
    /// suite run without `threading` keeps the same call shape.
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "threading"))]
pub use sequential::*;
