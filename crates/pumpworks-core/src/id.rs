use serde::{Deserialize, Serialize};

/// Identifies a fluid type (water, lava, ...). Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FluidKind(pub u32);
