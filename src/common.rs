pub mod db_utils;
pub mod error;
pub use error::AppError;
pub mod serde_utils;
