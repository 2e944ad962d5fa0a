#[derive(Clone)]
struct RefNode {
    key: i64,
    value: i64,
}

// Reference index, keys are 0..capacity and map directly to a slot.
struct RefNodes {
    entries: Vec<RefNode>,
}

impl RefNodes {
    fn new(capacity: usize) -> RefNodes {
        let mut entries: Vec<RefNode> = Vec::with_capacity(capacity);
        (0..capacity).for_each(|_| entries.push(RefNode { key: -1, value: 0 }));
        RefNodes { entries }
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|item| item.key >= 0).count()
    }

    fn lookup(&self, key: i64) -> Option<i64> {
        let entry = &self.entries[key as usize];
        if entry.key < 0 {
            None
        } else {
            Some(entry.value)
        }
    }

    fn insert(&mut self, key: i64, value: i64) -> Option<i64> {
        let old_value = self.lookup(key);
        self.entries[key as usize] = RefNode { key, value };
        old_value
    }

    fn remove(&mut self, key: i64) -> Option<i64> {
        let old_value = self.lookup(key);
        self.entries[key as usize].key = -1;
        old_value
    }

    fn keys(&self) -> Vec<i64> {
        self.entries
            .iter()
            .filter_map(|item| if item.key < 0 { None } else { Some(item.key) })
            .collect()
    }
}
