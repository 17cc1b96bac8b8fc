//! Error numbers used on the integer result surface.
//!
//! Values follow the newlib/POSIX numbering used by embedded RTOSes. Results
//! are reported negated.

pub const ENOENT: i32 = 2;
pub const EIO: i32 = 5;
pub const ENODEV: i32 = 19;
pub const EINVAL: i32 = 22;
