//! Route handlers organized by resource
//!
//! - users: login and user records
//! - description: the site description
//! - desa: village staff (read-only)
//! - blogs: blog posts with image uploads
//! - uploads: static image files
//! - health: health check endpoint

pub mod blogs;
pub mod common;
pub mod desa;
pub mod description;
pub mod health;
pub mod uploads;
pub mod users;
