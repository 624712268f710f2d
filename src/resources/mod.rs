//! Primitives the maintenance phases delegate to: the package manager, the
//! mirroring copy tool and age-based pruning.
pub mod mirror;
pub mod package;
pub mod prune;
