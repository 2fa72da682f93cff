//! Files produced by the Kotlin backend.

mod fake_file;

pub use fake_file::{FakeFile, relative_path};
