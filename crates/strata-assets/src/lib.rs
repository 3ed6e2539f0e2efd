//! JSON variant tables for world generation: deposits, landforms, geologic
//! provinces, and block patches, with a lenient directory loader.

mod deposit;
mod error;
mod loader;
mod patch;
mod terrain;

pub use deposit::{ChildDepositDef, DepositDef, DepositShape, GradeDistribution, Placement};
pub use error::AssetError;
pub use loader::WorldGenAssets;
pub use patch::BlockPatchDef;
pub use terrain::{LandformDef, ProvinceDef, VariantsFile};
