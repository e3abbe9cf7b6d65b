//! Debit/credit splitter and round-robin batcher.

use std::collections::VecDeque;

use polars::prelude::{AnyValue, DataFrame, IdxCa, IdxSize, NewChunkedArray};
use tracing::debug;

use crate::error::EnumProcessError;
use crate::load::require_column;

/// Discriminant column.
pub const C_COL_DISCRIMINANT: &str = "type";
/// Discriminant tag of debit rows.
pub const C_TAG_DEBIT: &str = "d";
/// Discriminant tag of credit rows.
pub const C_TAG_CREDIT: &str = "c";
/// Default batch capacity (five debit/credit pairs).
pub const N_MAX_ENTRIES_PER_BATCH_DEFAULT: usize = 10;

/// Row positions of the two discriminant classes, each in row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecDebitCreditPartition {
    pub debit: Vec<IdxSize>,
    pub credit: Vec<IdxSize>,
}

/// Partition row positions by the `type` column.
///
/// Rows tagged neither `d` nor `c` (including null and non-text values) are dropped.
pub fn partition_debit_credit(
    df: &DataFrame,
) -> Result<SpecDebitCreditPartition, EnumProcessError> {
    require_column(df, C_COL_DISCRIMINANT)?;
    let col = df.column(C_COL_DISCRIMINANT)?;

    let mut partition = SpecDebitCreditPartition::default();
    for n_idx_row in 0..col.len() {
        let c_tag = match col.get(n_idx_row)? {
            AnyValue::String(val) => val.to_string(),
            AnyValue::StringOwned(val) => val.to_string(),
            _ => continue,
        };
        let n_idx = n_idx_row as IdxSize;
        match c_tag.as_str() {
            C_TAG_DEBIT => partition.debit.push(n_idx),
            C_TAG_CREDIT => partition.credit.push(n_idx),
            _ => {}
        }
    }

    Ok(partition)
}

/// Plan batches as lists of row positions.
///
/// While both classes have rows, each batch alternates debit, credit up to
/// `max_entries_per_batch / 2` pairs. Whatever remains afterwards goes into a
/// single uncapped leftover batch: debit remainder first, then credit.
pub fn plan_interleaved_batches(
    partition: &SpecDebitCreditPartition,
    max_entries_per_batch: usize,
) -> Vec<Vec<IdxSize>> {
    // at least one pair per batch
    let n_pairs_max = usize::max(1, max_entries_per_batch / 2);

    let mut q_debit: VecDeque<IdxSize> = partition.debit.iter().copied().collect();
    let mut q_credit: VecDeque<IdxSize> = partition.credit.iter().copied().collect();
    let mut l_batches = Vec::new();

    while !q_debit.is_empty() && !q_credit.is_empty() {
        let mut l_batch = Vec::with_capacity(n_pairs_max * 2);
        for _ in 0..n_pairs_max {
            if q_debit.is_empty() || q_credit.is_empty() {
                break;
            }
            l_batch.extend(q_debit.pop_front());
            l_batch.extend(q_credit.pop_front());
        }
        l_batches.push(l_batch);
    }

    if !q_debit.is_empty() || !q_credit.is_empty() {
        l_batches.push(q_debit.into_iter().chain(q_credit).collect());
    }

    l_batches
}

/// Split `df` into interleaved debit/credit batches, numbered by position.
pub fn split_into_batches(
    df: &DataFrame,
    max_entries_per_batch: usize,
) -> Result<Vec<DataFrame>, EnumProcessError> {
    let partition = partition_debit_credit(df)?;
    debug!(
        debit = partition.debit.len(),
        credit = partition.credit.len(),
        dropped = df.height() - partition.debit.len() - partition.credit.len(),
        "rows partitioned"
    );

    plan_interleaved_batches(&partition, max_entries_per_batch)
        .into_iter()
        .map(|l_idx| -> Result<DataFrame, EnumProcessError> {
            let idx = IdxCa::from_vec("idx".into(), l_idx);
            Ok(df.take(&idx)?)
        })
        .collect()
}
