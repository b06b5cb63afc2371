//! Валидация инвариантов и структурная статистика списка.

/// Макрос для debug-time проверки инвариантов.
///
/// В release-сборках компилируется в no-op.
#[macro_export]
macro_rules! debug_assert_invariant {
    ($cond:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            if !$cond {
                panic!("Invariant violation: {}", format!($($arg)*));
            }
        }
    };
}

/// Макрос для валидации условий с возвратом ошибки.
#[macro_export]
macro_rules! validate {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Нарушение структурного инварианта, найденное `validate_invariants`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Уровень узла или списка вне допустимых границ
    InvalidLevel { node_level: usize, max_level: usize },
    /// Нарушен порядок сортировки (score, value)
    SortOrderViolation { message: String },
    /// Длина списка не соответствует реальному числу узлов
    LengthMismatch { expected: usize, actual: usize },
    /// Span слота не равен числу шагов нулевого уровня до forward-узла
    SpanMismatch {
        level: usize,
        expected: usize,
        actual: usize,
    },
    /// Backward-ссылка указывает на неверный узел
    InvalidBackwardLink { message: String },
    /// Forward-ссылка указывает на несуществующий узел
    InvalidForwardLink { message: String },
    /// Хвост не указывает на последний узел
    TailMismatch { message: String },
}

/// Статистика структуры SkipList.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipListStatistics {
    /// Количество узлов
    pub node_count: usize,
    /// Распределение по высотам (индекс = высота - 1)
    pub level_distribution: Vec<usize>,
    /// Текущий максимальный уровень
    pub current_max_level: usize,
    /// Максимально возможный уровень
    pub max_possible_level: usize,
    /// Средняя высота узла
    pub average_level: f64,
}

impl SkipListStatistics {
    /// Создаёт пустую статистику.
    pub fn empty(max_level: usize) -> Self {
        Self {
            node_count: 0,
            level_distribution: vec![0; max_level],
            current_max_level: 1,
            max_possible_level: max_level,
            average_level: 0.0,
        }
    }

    /// Вычисляет среднюю высоту.
    pub fn compute_average_level(&mut self) {
        if self.node_count == 0 {
            self.average_level = 0.0;
            return;
        }

        let total_levels: usize = self
            .level_distribution
            .iter()
            .enumerate()
            .map(|(level, &count)| (level + 1) * count)
            .sum();

        self.average_level = total_levels as f64 / self.node_count as f64;
    }

    /// Форматирует статистику для вывода.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("SkipList Statistics:\n");
        report.push_str(&format!("  Total nodes: {}\n", self.node_count));
        report.push_str(&format!(
            "  Current max level: {}\n",
            self.current_max_level
        ));
        report.push_str(&format!(
            "  Max possible level: {}\n",
            self.max_possible_level
        ));
        report.push_str(&format!("  Average level: {:.2}\n", self.average_level));
        report.push_str("  Level distribution:\n");

        for (level, &count) in self.level_distribution.iter().enumerate() {
            if count > 0 {
                report.push_str(&format!("    level {:>2}: {}\n", level + 1, count));
            }
        }

        report
    }
}
