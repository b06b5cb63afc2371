//! SkipList с учётом рангов — упорядоченный индекс по ключу
//! (score, value).
//!
//! # Модули
//!
//! - `node`: арена, узлы и слоты уровней.
//! - `list`: сам список — вставка, удаление, ранги, диапазоны.
//! - `range`: закрытый диапазон по score.
//! - `safety`: валидация инвариантов и статистика.

pub mod list;
pub mod node;
pub mod range;
pub mod safety;

pub use list::{Iter, RangeIter, RevIter, SkipList};
pub use node::MAX_LEVEL;
pub use range::ScoreRange;
pub use safety::{SkipListStatistics, ValidationError};
