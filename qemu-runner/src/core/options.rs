//! Ordered emulator option table and its flattening into argv tokens.
//!
//! Entry order is the command line order, so the table is an insertion-ordered
//! list rather than a hash map. Keys are unique: inserting an existing key
//! replaces its value where it already sits.

/// One emulator flag with an optional value. `None` marks a no-argument flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTable {
    entries: Vec<OptionEntry>,
}

impl OptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key`, replacing the value in place if the key already exists.
    ///
    /// Returns the previous value when a replacement happened.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Option<String>,
    ) -> Option<Option<String>> {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }
        self.entries.push(OptionEntry { key, value });
        None
    }

    /// Insert a flag that takes a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, Some(value.into()));
    }

    /// Insert a no-argument flag.
    pub fn flag(&mut self, key: impl Into<String>) {
        self.insert(key, None);
    }

    pub fn get(&self, key: &str) -> Option<&OptionEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a OptionTable {
    type Item = &'a OptionEntry;
    type IntoIter = std::slice::Iter<'a, OptionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Flatten `table` into an argv: `program`, then each key followed by its value if any.
pub fn flatten(program: &str, table: &OptionTable) -> Vec<String> {
    let mut argv = Vec::with_capacity(1 + table.len() * 2);
    argv.push(program.to_string());
    for entry in table {
        argv.push(entry.key.clone());
        if let Some(value) = &entry.value {
            argv.push(value.clone());
        }
    }
    argv
}
