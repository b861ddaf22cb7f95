//! # HostelCare Auth
//!
//! Access-token claims and JWT utilities.
//!
//! Students and admins share one token format. The `role` claim tells them
//! apart and, for admins, `permissions` carries the account's capability
//! flags as `resource:action` strings.
//!
//! # Example
//!
//! ```ignore
//! use hostelcare_auth::{Role, create_access_token, verify_token};
//! use hostelcare_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//!
//! let token = create_access_token(student_id, "ada@hostel.edu", Role::Student, vec![], &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, Role};
pub use jwt::{create_access_token, verify_token};
