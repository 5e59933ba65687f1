/// A page of records plus the total row count for the underlying query.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    pub records: Vec<T>,
    pub total_count: u64,
}
