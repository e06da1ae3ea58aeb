//! Version model - pure parsing, incrementing and text patching, free of I/O

pub mod fields;
pub mod version;
pub mod version_code;

pub use fields::{apply_version_fields, extract_version_fields, FieldLayout, VersionFields};
pub use version::{increment_version_name, IncrementKind, Version};
pub use version_code::increment_version_code;
