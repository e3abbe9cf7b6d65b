//! `sheetkit_proc`:
//! Spreadsheet processing core.
//!
//! - `validate` : identifier length/grouping checks and masking
//! - `load`     : upload parsing and required-column checks
//! - `mask`     : masking pipeline over the `CC_number` column
//! - `split`    : debit/credit partition and interleaved batching
//! - `assemble` : batches into a multi-sheet workbook
//! - `service`  : the request-facing [`SheetProcessor`]
pub mod assemble;
pub mod error;
pub mod load;
pub mod mask;
pub mod service;
pub mod split;
pub mod validate;

pub use assemble::{SpecAssembledWorkbook, assemble_workbook, derive_batch_sheet_name};
pub use error::EnumProcessError;
pub use load::{load_table, require_column};
pub use mask::apply_identifier_masking;
pub use service::{
    C_DOWNLOAD_NAME_MASKING, C_DOWNLOAD_NAME_SPLIT, EnumProcessMode, SheetProcessor,
    SpecProcessOptions, SpecProcessOutput,
};
pub use split::{
    N_MAX_ENTRIES_PER_BATCH_DEFAULT, SpecDebitCreditPartition, partition_debit_credit,
    plan_interleaved_batches, split_into_batches,
};
pub use validate::{is_correct_grouping, is_correct_length, is_valid, mask_identifier};
