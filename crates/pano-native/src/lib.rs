pub mod assets;
pub mod check;
pub mod cli;
pub mod store;
pub mod uploader;

pub use assets::{content_type_for, read_asset, resolve_asset, AssetSource};
pub use check::{check_tour, Finding, Severity};
pub use store::JsonFileStore;
pub use uploader::LocalUploader;
