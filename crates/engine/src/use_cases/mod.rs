//! Use cases - User story orchestration.
//!
//! Each module groups the use cases of one area. Use cases talk to
//! infrastructure through port traits only.

pub mod assets;
pub mod authoring;
pub mod library;
pub mod reading;

pub use assets::AssetUseCases;
pub use authoring::AuthoringUseCases;
pub use library::LibraryUseCases;
pub use reading::ReadingUseCases;
