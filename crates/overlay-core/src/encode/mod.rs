//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Encoding composited RGBA buffers to PNG without altering pixel values
//! - Naming the exported file
//!
//! # Examples
//!
//! ```ignore
//! use overlay_core::encode::{export_png, suggested_filename};
//!
//! let png = export_png(&composited).unwrap();
//! std::fs::write(suggested_filename("beach.jpg"), png).unwrap();
//! ```

mod png;

pub use png::{encode_png, export_png, suggested_filename, EncodeError};
