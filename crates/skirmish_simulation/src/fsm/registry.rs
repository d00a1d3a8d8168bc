//! Name → tag registry на границе со строковыми событиями
//!
//! Perception collaborator шлёт имена ("SeePlayer", "LosePlayer").
//! Парсинг строк живёт только здесь — сама машина работает с tag'ами.

use std::collections::HashMap;

use super::{FsmError, Tag};

#[derive(Debug, Clone)]
pub struct TriggerRegistry<T: Tag> {
    by_name: HashMap<String, T>,
}

impl<T: Tag> Default for TriggerRegistry<T> {
    fn default() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }
}

impl<T: Tag> TriggerRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, T)>,
    {
        let mut registry = Self::new();
        for (name, trigger) in entries {
            registry.register(name, trigger);
        }
        registry
    }

    pub fn register(&mut self, name: &str, trigger: T) {
        self.by_name.insert(name.to_string(), trigger);
    }

    /// Точное совпадение имени (case-sensitive, как enum name)
    pub fn resolve(&self, name: &str) -> Result<T, FsmError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| FsmError::UnknownTrigger(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
