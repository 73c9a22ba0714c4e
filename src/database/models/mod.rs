pub mod asset;

pub use asset::{Asset, AssetId, AssetPatch, NewAsset, PayloadError};
