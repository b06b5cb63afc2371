//! Пропускной список с учётом рангов (rank-aware SkipList).
//!
//! Ключ — пара (score: f64, value: String): сортировка по score по
//! возрастанию, при равных score — лексикографически по value.
//! Span-счётчики на каждом уровне дают ранги за ожидаемый O(log n).
//!
//! Уникальность ключей — ответственность вызывающего кода: повторная
//! вставка той же пары создаёт второй узел (семантика мультимножества),
//! проверок на дубликаты нет.
//!
//! Внутренней синхронизации нет; при конкурентном доступе список
//! оборачивается внешним мьютексом.

use std::{cmp::Ordering, collections::HashMap};

use ordered_float::OrderedFloat;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{
    node::{Link, NodeArena, NodeId, HEAD, MAX_LEVEL},
    safety::{SkipListStatistics, ValidationError},
    ScoreRange,
};
use crate::{
    debug_assert_invariant,
    error::{SkipListError, SkipListResult},
    validate,
};

/// Вероятность повышения уровня, fixed-point: 0x4000 / 0x10000 = 0.25.
const P: u32 = 0x4000;
const MASK: u32 = 0xFFFF;

/// Пропускной список: арена узлов, хвост, текущий уровень, длина
/// и собственный генератор случайных уровней.
#[derive(Debug, Clone)]
pub struct SkipList {
    arena: NodeArena,
    tail: Link,
    level: usize,
    length: usize,
    rng: StdRng,
}

/// Итератор по элементам в порядке возрастания ключа.
pub struct Iter<'a> {
    arena: &'a NodeArena,
    current: Link,
}

/// Итератор по элементам в обратном порядке (по backward-ссылкам).
pub struct RevIter<'a> {
    arena: &'a NodeArena,
    current: Link,
}

/// Итератор по элементам внутри закрытого диапазона score.
pub struct RangeIter<'a> {
    arena: &'a NodeArena,
    current: Link,
    range: ScoreRange,
}

/// Строгий порядок ключей: (score_a, value_a) < (score_b, value_b).
#[inline]
fn key_lt(score_a: f64, value_a: &str, score_b: f64, value_b: &str) -> bool {
    match OrderedFloat(score_a).cmp(&OrderedFloat(score_b)) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => value_a < value_b,
    }
}

impl SkipList {
    /// Создаёт пустой список; генератор уровней сеется из энтропии ОС.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Создаёт пустой список с детерминированным генератором уровней.
    /// Полезно в тестах: одинаковый seed — одинаковая форма списка.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            arena: NodeArena::new(),
            tail: None,
            level: 1,
            length: 0,
            rng,
        }
    }

    /// Число элементов в списке.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Генерирует случайную высоту нового узла: геометрическое
    /// распределение с p = 0.25, потолок `MAX_LEVEL`.
    fn random_level(&mut self) -> usize {
        let mut lvl = 1;

        while lvl < MAX_LEVEL && (self.rng.gen::<u32>() & MASK) < P {
            lvl += 1;
        }

        lvl
    }

    /// Поиск предшественников на каждом уровне (строгое `<` по ключу)
    /// с накоплением рангов предшественников.
    fn predecessors(
        &self,
        score: f64,
        value: &str,
    ) -> ([NodeId; MAX_LEVEL], [usize; MAX_LEVEL]) {
        let mut update = [HEAD; MAX_LEVEL];
        let mut rank = [0usize; MAX_LEVEL];

        let mut x = HEAD;
        for i in (0..self.level).rev() {
            rank[i] = if i == self.level - 1 { 0 } else { rank[i + 1] };

            while let Some(next) = self.arena.get(x).levels[i].forward {
                let nxt = self.arena.get(next);
                if key_lt(nxt.score, &nxt.value, score, value) {
                    rank[i] += self.arena.get(x).levels[i].span;
                    x = next;
                } else {
                    break;
                }
            }
            update[i] = x;
        }

        (update, rank)
    }

    /// Вставляет элемент. Дубликаты не отслеживаются: одинаковая пара
    /// (score, value) даст два узла с неопределённым взаимным порядком.
    pub fn insert(&mut self, score: f64, value: impl Into<String>) {
        let value = value.into();
        let (mut update, mut rank) = self.predecessors(score, &value);

        let height = self.random_level();
        debug_assert_invariant!(height <= MAX_LEVEL, "height {} above ceiling", height);

        // Новые уровни стартуют от головы; span головы там — вся длина,
        // поскольку других узлов этой высоты ещё нет.
        if height > self.level {
            for i in self.level..height {
                rank[i] = 0;
                update[i] = HEAD;
                self.arena.get_mut(HEAD).levels[i].span = self.length;
            }
            self.level = height;
        }

        let x = self.arena.alloc(score, value, height);

        for i in 0..height {
            let (prev_forward, prev_span) = {
                let prev = self.arena.get(update[i]);
                (prev.levels[i].forward, prev.levels[i].span)
            };

            let hops = rank[0] - rank[i];
            {
                let node = self.arena.get_mut(x);
                node.levels[i].forward = prev_forward;
                node.levels[i].span = prev_span - hops;
            }
            let prev = self.arena.get_mut(update[i]);
            prev.levels[i].forward = Some(x);
            prev.levels[i].span = hops + 1;
        }

        // Уровни выше нового узла: под их пролётом стало на узел больше.
        for i in height..self.level {
            self.arena.get_mut(update[i]).levels[i].span += 1;
        }

        if update[0] != HEAD {
            self.arena.get_mut(x).backward = Some(update[0]);
        }
        match self.arena.get(x).levels[0].forward {
            Some(next) => self.arena.get_mut(next).backward = Some(x),
            None => self.tail = Some(x),
        }

        self.length += 1;
    }

    /// Удаляет элемент с точно совпадающей парой (score, value).
    pub fn remove(&mut self, score: f64, value: &str) -> SkipListResult<()> {
        let (update, _) = self.predecessors(score, value);

        if let Some(target) = self.arena.get(update[0]).levels[0].forward {
            let node = self.arena.get(target);
            if OrderedFloat(node.score) == OrderedFloat(score) && node.value == value {
                self.unlink(target, &update);
                return Ok(());
            }
        }

        Err(SkipListError::NotFound)
    }

    /// Выцепляет узел `x` из всех уровней по готовой цепочке
    /// предшественников. Общий примитив для `remove` и массовых
    /// удалений: после расцепления цепочка остаётся валидной для
    /// следующего узла.
    fn unlink(&mut self, x: NodeId, update: &[NodeId; MAX_LEVEL]) {
        debug_assert_invariant!(self.length > 0, "unlink on empty list");

        for i in 0..self.level {
            if self.arena.get(update[i]).levels[i].forward == Some(x) {
                let (x_forward, x_span) = {
                    let node = self.arena.get(x);
                    (node.levels[i].forward, node.levels[i].span)
                };
                let prev = self.arena.get_mut(update[i]);
                prev.levels[i].span += x_span;
                prev.levels[i].span -= 1;
                prev.levels[i].forward = x_forward;
            } else {
                // Узел был под пролётом этого уровня.
                self.arena.get_mut(update[i]).levels[i].span -= 1;
            }
        }

        let (x_forward, x_backward) = {
            let node = self.arena.get(x);
            (node.levels[0].forward, node.backward)
        };
        match x_forward {
            Some(next) => self.arena.get_mut(next).backward = x_backward,
            None => self.tail = x_backward,
        }

        while self.level > 1 && self.arena.get(HEAD).levels[self.level - 1].forward.is_none() {
            self.level -= 1;
        }

        self.arena.release(x);
        self.length -= 1;
    }

    /// Возвращает 1-базный ранг элемента с данной парой (score, value).
    pub fn rank(&self, score: f64, value: &str) -> SkipListResult<usize> {
        let mut rank = 0usize;
        let mut x = HEAD;

        for i in (0..self.level).rev() {
            while let Some(next) = self.arena.get(x).levels[i].forward {
                let nxt = self.arena.get(next);
                // `<=` по value (в отличие от строгого `<` вставки):
                // обход встаёт ровно на искомый узел, а не перед ним.
                let advance = match OrderedFloat(nxt.score).cmp(&OrderedFloat(score)) {
                    Ordering::Less => true,
                    Ordering::Equal => nxt.value.as_str() <= value,
                    Ordering::Greater => false,
                };
                if !advance {
                    break;
                }
                rank += self.arena.get(x).levels[i].span;
                x = next;
            }

            if x != HEAD {
                let node = self.arena.get(x);
                if OrderedFloat(node.score) == OrderedFloat(score) && node.value == value {
                    return Ok(rank);
                }
            }
        }

        Err(SkipListError::NotFound)
    }

    /// Возвращает value элемента по 1-базному рангу.
    pub fn value_by_rank(&self, rank: usize) -> SkipListResult<&str> {
        if rank == 0 || rank > self.length {
            return Err(SkipListError::NotFound);
        }

        let mut traversed = 0usize;
        let mut x = HEAD;

        for i in (0..self.level).rev() {
            while let Some(next) = self.arena.get(x).levels[i].forward {
                if traversed + self.arena.get(x).levels[i].span > rank {
                    break;
                }
                traversed += self.arena.get(x).levels[i].span;
                x = next;
            }

            if traversed == rank {
                return Ok(self.arena.get(x).value.as_str());
            }
        }

        Err(SkipListError::NotFound)
    }

    /// Есть ли в списке хотя бы один элемент со score из диапазона.
    ///
    /// Достаточно сравнить границы с первым и последним узлами: score
    /// монотонны вдоль цепочки нулевого уровня.
    pub fn is_in_range(&self, range: &ScoreRange) -> bool {
        if range.is_empty() {
            return false;
        }

        let tail = match self.tail {
            Some(t) => t,
            None => return false,
        };
        if !range.gte_min(self.arena.get(tail).score) {
            return false;
        }

        let first = match self.arena.get(HEAD).levels[0].forward {
            Some(f) => f,
            None => return false,
        };
        if !range.lte_max(self.arena.get(first).score) {
            return false;
        }

        true
    }

    /// Первый (минимальный) элемент диапазона.
    pub fn first_in_range(&self, range: &ScoreRange) -> SkipListResult<(f64, &str)> {
        if !self.is_in_range(range) {
            return Err(SkipListError::NotFound);
        }

        // Спускаемся к последнему узлу со score ниже min.
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.arena.get(x).levels[i].forward {
                if range.gte_min(self.arena.get(next).score) {
                    break;
                }
                x = next;
            }
        }

        let first = self.arena.get(x).levels[0].forward.ok_or(SkipListError::NotFound)?;
        let node = self.arena.get(first);
        if !range.lte_max(node.score) {
            return Err(SkipListError::NotFound);
        }

        Ok((node.score, node.value.as_str()))
    }

    /// Последний (максимальный) элемент диапазона.
    pub fn last_in_range(&self, range: &ScoreRange) -> SkipListResult<(f64, &str)> {
        if !self.is_in_range(range) {
            return Err(SkipListError::NotFound);
        }

        // Спускаемся к последнему узлу со score не выше max.
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.arena.get(x).levels[i].forward {
                if !range.lte_max(self.arena.get(next).score) {
                    break;
                }
                x = next;
            }
        }

        if x == HEAD {
            return Err(SkipListError::NotFound);
        }
        let node = self.arena.get(x);
        if !range.gte_min(node.score) {
            return Err(SkipListError::NotFound);
        }

        Ok((node.score, node.value.as_str()))
    }

    /// Удаляет все элементы со score из диапазона; возвращает число
    /// удалённых.
    pub fn remove_range_by_score(&mut self, range: &ScoreRange) -> usize {
        let mut update = [HEAD; MAX_LEVEL];

        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.arena.get(x).levels[i].forward {
                if range.gte_min(self.arena.get(next).score) {
                    break;
                }
                x = next;
            }
            update[i] = x;
        }

        // Цепочка предшественников переживает каждое расцепление:
        // unlink перелинковывает их forward-слоты на следующий узел.
        let mut removed = 0usize;
        let mut current = self.arena.get(x).levels[0].forward;

        while let Some(id) = current {
            if !range.lte_max(self.arena.get(id).score) {
                break;
            }
            let next = self.arena.get(id).levels[0].forward;
            self.unlink(id, &update);
            removed += 1;
            current = next;
        }

        removed
    }

    /// Удаляет элементы с рангами из закрытого интервала
    /// `[start, end]` (1-базные); возвращает число удалённых.
    pub fn remove_range_by_rank(&mut self, start: usize, end: usize) -> usize {
        let mut update = [HEAD; MAX_LEVEL];
        let mut traversed = 0usize;

        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.arena.get(x).levels[i].forward {
                if traversed + self.arena.get(x).levels[i].span >= start {
                    break;
                }
                traversed += self.arena.get(x).levels[i].span;
                x = next;
            }
            update[i] = x;
        }

        traversed += 1;

        let mut removed = 0usize;
        let mut current = self.arena.get(x).levels[0].forward;

        while let Some(id) = current {
            if traversed > end {
                break;
            }
            let next = self.arena.get(id).levels[0].forward;
            self.unlink(id, &update);
            removed += 1;
            traversed += 1;
            current = next;
        }

        removed
    }

    /// Первый элемент (минимальный ключ) списка.
    pub fn first(&self) -> Option<(f64, &str)> {
        self.arena.get(HEAD).levels[0].forward.map(|id| {
            let node = self.arena.get(id);
            (node.score, node.value.as_str())
        })
    }

    /// Последний элемент (максимальный ключ) списка.
    pub fn last(&self) -> Option<(f64, &str)> {
        self.tail.map(|id| {
            let node = self.arena.get(id);
            (node.score, node.value.as_str())
        })
    }

    /// Удаляет все элементы.
    pub fn clear(&mut self) {
        self.arena.reset();
        self.tail = None;
        self.level = 1;
        self.length = 0;
    }

    /// Итератор по (score, value) в порядке возрастания ключа.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            arena: &self.arena,
            current: self.arena.get(HEAD).levels[0].forward,
        }
    }

    /// Итератор в обратном порядке, от хвоста по backward-ссылкам.
    pub fn iter_rev(&self) -> RevIter<'_> {
        RevIter {
            arena: &self.arena,
            current: self.tail,
        }
    }

    /// Итератор по элементам закрытого диапазона score.
    pub fn range_iter(&self, range: ScoreRange) -> RangeIter<'_> {
        let start = if self.is_in_range(&range) {
            let mut x = HEAD;
            for i in (0..self.level).rev() {
                while let Some(next) = self.arena.get(x).levels[i].forward {
                    if range.gte_min(self.arena.get(next).score) {
                        break;
                    }
                    x = next;
                }
            }
            self.arena.get(x).levels[0].forward
        } else {
            None
        };

        RangeIter {
            arena: &self.arena,
            current: start,
            range,
        }
    }

    /// Проверяет структурные инварианты списка: порядок сортировки,
    /// backward-цепочку, длину, хвост, высоту и все span-счётчики.
    ///
    /// Идёт за O(n · h); предназначено для тестов и отладки.
    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        validate!(
            self.level >= 1 && self.level <= MAX_LEVEL,
            ValidationError::InvalidLevel {
                node_level: self.level,
                max_level: MAX_LEVEL,
            }
        );

        // Проход по нулевому уровню: порядок, backward, длина, позиции.
        let mut position = HashMap::new();
        position.insert(HEAD, 0usize);

        let mut prev = HEAD;
        let mut count = 0usize;
        let mut current = self.arena.get(HEAD).levels[0].forward;

        while let Some(id) = current {
            let node = self.arena.get(id);
            count += 1;
            position.insert(id, count);

            validate!(
                node.height() >= 1 && node.height() <= self.level,
                ValidationError::InvalidLevel {
                    node_level: node.height(),
                    max_level: self.level,
                }
            );

            if prev != HEAD {
                let p = self.arena.get(prev);
                validate!(
                    !key_lt(node.score, &node.value, p.score, &p.value),
                    ValidationError::SortOrderViolation {
                        message: format!(
                            "({}, {:?}) appears after ({}, {:?})",
                            node.score, node.value, p.score, p.value
                        ),
                    }
                );
            }

            let expected_backward = if prev == HEAD { None } else { Some(prev) };
            validate!(
                node.backward == expected_backward,
                ValidationError::InvalidBackwardLink {
                    message: format!("node {:?} has wrong backward link", node.value),
                }
            );

            prev = id;
            current = node.levels[0].forward;
        }

        validate!(
            count == self.length,
            ValidationError::LengthMismatch {
                expected: self.length,
                actual: count,
            }
        );

        let tail_ok = if count == 0 {
            self.tail.is_none()
        } else {
            self.tail == Some(prev)
        };
        validate!(
            tail_ok,
            ValidationError::TailMismatch {
                message: format!("tail = {:?} after walking {} nodes", self.tail, count),
            }
        );

        // Верхний занятый уровень не должен пустовать.
        if self.level > 1 {
            validate!(
                self.arena.get(HEAD).levels[self.level - 1].forward.is_some(),
                ValidationError::InvalidLevel {
                    node_level: self.level,
                    max_level: MAX_LEVEL,
                }
            );
        }

        // Span каждого занятого слота равен числу шагов нулевого уровня
        // до его forward-узла.
        for (&id, &pos) in &position {
            let node = self.arena.get(id);
            for (lvl, slot) in node.levels.iter().take(self.level).enumerate() {
                let forward = match slot.forward {
                    Some(f) => f,
                    None => continue,
                };
                let forward_pos = match position.get(&forward) {
                    Some(&p) => p,
                    None => {
                        return Err(ValidationError::InvalidForwardLink {
                            message: format!("level {} links to an unknown node", lvl),
                        })
                    }
                };
                validate!(
                    forward_pos - pos == slot.span,
                    ValidationError::SpanMismatch {
                        level: lvl,
                        expected: forward_pos - pos,
                        actual: slot.span,
                    }
                );
            }
        }

        Ok(())
    }

    /// Собирает структурную статистику: распределение высот, средняя
    /// высота, текущий уровень.
    pub fn statistics(&self) -> SkipListStatistics {
        let mut stats = SkipListStatistics::empty(MAX_LEVEL);
        stats.current_max_level = self.level;

        let mut current = self.arena.get(HEAD).levels[0].forward;
        while let Some(id) = current {
            let node = self.arena.get(id);
            stats.node_count += 1;
            stats.level_distribution[node.height() - 1] += 1;
            current = node.levels[0].forward;
        }

        stats.compute_average_level();
        stats
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SkipList {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self
                .iter()
                .zip(other.iter())
                .all(|((s1, v1), (s2, v2))| OrderedFloat(s1) == OrderedFloat(s2) && v1 == v2)
    }
}

impl<'a> IntoIterator for &'a SkipList {
    type Item = (f64, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (f64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.arena.get(id);

        self.current = node.levels[0].forward;

        Some((node.score, node.value.as_str()))
    }
}

impl<'a> Iterator for RevIter<'a> {
    type Item = (f64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.arena.get(id);

        self.current = node.backward;

        Some((node.score, node.value.as_str()))
    }
}

impl<'a> Iterator for RangeIter<'a> {
    type Item = (f64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.arena.get(id);

        if !self.range.lte_max(node.score) {
            return None;
        }

        self.current = node.levels[0].forward;

        Some((node.score, node.value.as_str()))
    }
}
