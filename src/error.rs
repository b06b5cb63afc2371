//! Ошибки операций над списком.

use thiserror::Error;

pub type SkipListResult<T> = Result<T, SkipListError>;

/// Единственный вид ошибки: запрошенного элемента, ранга или
/// диапазона в списке нет. Фатальных ошибок у операций не бывает —
/// некорректный диапазон (`min > max`) просто ничего не находит.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipListError {
    #[error("entry not found")]
    NotFound,
}
