//! Модель узла и арена пропускного списка.
//!
//! Узлы живут в арене (`Vec<Option<Node>>`) и адресуются стабильными
//! индексами вместо указателей: удаление узла — чистая операция над
//! данными, без висячих ссылок, а владение ареной единолично у списка.

/// Максимальный уровень пропускного списка.
pub const MAX_LEVEL: usize = 64;

/// Индекс узла в арене.
pub(crate) type NodeId = usize;

/// Ссылка вперёд: `None` — конец списка на данном уровне.
pub(crate) type Link = Option<NodeId>;

/// Индекс головного (dummy) узла; полезных данных не содержит.
pub(crate) const HEAD: NodeId = 0;

/// Слот уровня: ссылка на следующий узел этого уровня и span —
/// число шагов нулевого уровня до него.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Level {
    pub forward: Link,
    pub span: usize,
}

impl Level {
    fn empty() -> Self {
        Self {
            forward: None,
            span: 0,
        }
    }
}

/// Узел пропускного списка: ключ (score, value), слоты уровней
/// и backward-ссылка нулевого уровня.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub score: f64,
    pub value: String,
    pub levels: Vec<Level>,
    pub backward: Link,
}

impl Node {
    fn new(score: f64, value: String, height: usize) -> Self {
        Self {
            score,
            value,
            levels: vec![Level::empty(); height],
            backward: None,
        }
    }

    /// Головной узел: слоты всех `MAX_LEVEL` уровней, пустой ключ.
    fn head() -> Self {
        Self::new(0.0, String::new(), MAX_LEVEL)
    }

    /// Высота узла — число слотов уровней.
    pub fn height(&self) -> usize {
        self.levels.len()
    }
}

/// Арена узлов. Слот 0 навсегда занят головным узлом; освобождённые
/// слоты переиспользуются через free-список.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Node::head())],
            free: Vec::new(),
        }
    }

    pub fn get(&self, id: NodeId) -> &Node {
        self.slots[id].as_ref().expect("vacant node slot")
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id].as_mut().expect("vacant node slot")
    }

    /// Размещает новый узел, переиспользуя свободный слот, если есть.
    pub fn alloc(&mut self, score: f64, value: String, height: usize) -> NodeId {
        let node = Node::new(score, value, height);

        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Освобождает слот узла; сам узел при этом уничтожается.
    pub fn release(&mut self, id: NodeId) {
        debug_assert_ne!(id, HEAD, "head node is never released");
        self.slots[id] = None;
        self.free.push(id);
    }

    /// Сбрасывает арену к пустому состоянию с чистым головным узлом.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.slots.push(Some(Node::head()));
        self.free.clear();
    }
}
