//! `sheetkit_web`:
//! Browser front end for the spreadsheet processor.
//!
//! - `GET /`               : option picker
//! - `GET|POST /option{1,2}`: upload form of each mode
//! - `POST /upload1`       : masking, answers `processed_file1.xlsx`
//! - `POST /upload2`       : debit/credit split, answers `processed_file2.xlsx`
//! - `GET /health`         : liveness check
//! - `/static/*`           : assets from the configured directory
pub mod conf;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod templates;

pub use conf::SpecServerConf;
pub use error::EnumWebError;
pub use router::app_router;
pub use state::AppState;
