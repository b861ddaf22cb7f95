//! # HostelCare CLI
//!
//! Administrative commands and database seeding for development.
//!
//! ```ignore
//! use hostelcare_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(50).with_complaints_per_student(3);
//! seed_all(&pool, &ticket_config, config).await?;
//! ```

pub mod admins;
pub mod seeder;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;
