use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use rt_pvec::PvRef;
use rt_util::error::UserError;
use rt_value::{Cursor, ListTrait, MapTrait, Value};

use crate::consts::{capacity_for, ASCII9_MAX_ENTRIES, ASCII9_MAX_PROBE, VACUUM_DENOMINATOR, VACUUM_NUMERATOR};

const NONE_SLOT: u64 = u64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashMode {
    Ascii9,
    Value,
}

/// The open-addressed, double-hashed index array mapping a key's hash to
/// the physical cursor holding it (§4.5). Every `HashMap` value owns its
/// own table: `add`/`delete` always build a fresh one sized for the new
/// entry count rather than racing concurrent writers over a shared array,
/// trading the original's in-place CaS-claim discipline for the ownership
/// guarantees a freshly allocated `Arc` already gives a persistent value.
#[derive(Debug)]
struct IndexTable {
    capacity: usize,
    slots: Vec<AtomicU64>,
}

impl IndexTable {
    fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| AtomicU64::new(NONE_SLOT)).collect();
        Self { capacity, slots }
    }

    fn probe_sequence(&self, hash: u64) -> (usize, usize) {
        let start = (hash as usize) % self.capacity;
        let step = (((hash >> 4) | 1) as usize) % self.capacity;
        (start, step.max(1))
    }

    fn positions(&self, hash: u64) -> impl Iterator<Item = usize> + '_ {
        let (start, step) = self.probe_sequence(hash);
        (0..self.capacity).map(move |p| (start + p * step) % self.capacity)
    }

    fn slot(&self, idx: usize) -> u64 {
        self.slots[idx].load(Ordering::Acquire)
    }

    /// Claims the first empty slot in `hash`'s probe sequence via CAS.
    /// Returns the 1-based probe length, or `None` if the table is full.
    fn insert(&self, hash: u64, cursor: u64) -> Option<usize> {
        for (probe, idx) in self.positions(hash).enumerate() {
            if self.slots[idx]
                .compare_exchange(NONE_SLOT, cursor, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Some(probe + 1);
            }
        }
        None
    }
}

/// A packed bitmap of tombstoned physical cursors (§4.5).
#[derive(Debug, Default, Clone)]
struct DeletionBitmap {
    words: Vec<u64>,
}

impl DeletionBitmap {
    fn is_deleted(&self, cursor: usize) -> bool {
        let word = cursor / 64;
        word < self.words.len() && self.words[word] & (1 << (cursor % 64)) != 0
    }

    fn marked(&self, cursor: usize) -> Self {
        let mut words = self.words.clone();
        let word = cursor / 64;
        if word >= words.len() {
            words.resize(word + 1, 0);
        }
        words[word] |= 1 << (cursor % 64);
        Self { words }
    }
}

/// A map backed by two parallel `PvRef<Value>` arrays (keys and values), a
/// `PvRef<u64>` of cached hashes, and an [`IndexTable`] resolving a hash to
/// its physical cursor (§4.5). Deletions tombstone rather than compact the
/// parallel arrays; a vacuum rebuilds everything once tombstones pile up.
#[derive(Debug, Clone)]
pub(crate) struct HashMap {
    keys: PvRef<Value>,
    values: PvRef<Value>,
    hashes: PvRef<u64>,
    index: Arc<IndexTable>,
    mode: HashMode,
    deleted: DeletionBitmap,
    n_deleted: usize,
    list_index: Arc<OnceLock<Vec<u64>>>,
}

impl HashMap {
    /// Builds a fresh hash-map from scratch, choosing ASCII9 hash mode when
    /// every key packs and the entry count stays under the ceiling, falling
    /// back to value hashing (and, if any key overruns the per-key probe
    /// ceiling even in value mode, that's simply accepted — only ASCII9 mode
    /// demotes on a probe-length violation).
    pub(crate) fn build(pairs: Vec<(Value, Value)>) -> Self {
        let prefer_ascii9 = pairs.len() < ASCII9_MAX_ENTRIES
            && pairs.iter().all(|(k, _)| k.payload().as_ascii9().is_some());
        match Self::try_build(&pairs, HashMode::Ascii9, prefer_ascii9) {
            Some(map) => map,
            None => Self::try_build(&pairs, HashMode::Value, true).expect("value-hash build never exceeds its probe ceiling"),
        }
    }

    fn try_build(pairs: &[(Value, Value)], mode: HashMode, enabled: bool) -> Option<Self> {
        if !enabled {
            return None;
        }
        let capacity = capacity_for(pairs.len());
        let index = IndexTable::with_capacity(capacity);
        let mut hashes = Vec::with_capacity(pairs.len());
        for (i, (key, _)) in pairs.iter().enumerate() {
            let hash = hash_of(key, mode);
            hashes.push(hash);
            let probe_len = index.insert(hash, i as u64).expect("table sized for its own entries");
            if mode == HashMode::Ascii9 && probe_len > ASCII9_MAX_PROBE {
                return None;
            }
        }
        Some(Self {
            keys: PvRef::new(pairs.iter().map(|(k, _)| k.clone()).collect()),
            values: PvRef::new(pairs.iter().map(|(_, v)| v.clone()).collect()),
            hashes: PvRef::new(hashes),
            index: Arc::new(index),
            mode,
            deleted: DeletionBitmap::default(),
            n_deleted: 0,
            list_index: Arc::new(OnceLock::new()),
        })
    }

    fn key_at(&self, cursor: usize) -> Value {
        self.keys.with_read(|s| s[cursor].clone())
    }

    fn value_at(&self, cursor: usize) -> Value {
        self.values.with_read(|s| s[cursor].clone())
    }

    fn hash_at(&self, cursor: usize) -> u64 {
        self.hashes.with_read(|s| s[cursor])
    }

    fn search_hash(&self, key: &Value) -> Option<u64> {
        match self.mode {
            HashMode::Ascii9 => key.payload().as_ascii9().map(rt_string::ascii9::hash),
            HashMode::Value => Some(key.hash()),
        }
    }

    fn all_pairs(&self) -> Vec<(Value, Value)> {
        (0..self.keys.len())
            .filter(|&c| !self.deleted.is_deleted(c))
            .map(|c| (self.key_at(c), self.value_at(c)))
            .collect()
    }

    fn build_list_index(&self) -> Vec<u64> {
        (0..self.keys.len() as u64).filter(|&c| !self.deleted.is_deleted(c as usize)).collect()
    }

    fn physical_cursor(&self, pair_index: usize) -> Option<u64> {
        self.list_index.get_or_init(|| self.build_list_index()).get(pair_index).copied()
    }
}

fn hash_of(key: &Value, mode: HashMode) -> u64 {
    match mode {
        HashMode::Ascii9 => rt_string::ascii9::hash(key.payload().as_ascii9().expect("ascii9 mode only ever hashes ascii9 keys")),
        HashMode::Value => key.hash(),
    }
}

impl MapTrait for HashMap {
    fn npairs(&self) -> usize {
        self.keys.len() - self.n_deleted
    }

    fn find(&self, key: &Value) -> Cursor {
        let hash = match self.search_hash(key) {
            Some(h) => h,
            None => return Cursor::NONE,
        };
        for idx in self.index.positions(hash) {
            let slot = self.index.slot(idx);
            if slot == NONE_SLOT {
                return Cursor::NONE;
            }
            if !self.deleted.is_deleted(slot as usize) && self.hash_at(slot as usize) == hash && self.key_at(slot as usize).equal(key) {
                return Cursor(slot);
            }
        }
        Cursor::NONE
    }

    fn next(&self, cursor: Cursor) -> Cursor {
        if cursor.is_none() || cursor.0 as usize >= self.keys.len() {
            return Cursor::NONE;
        }
        let hash = self.hash_at(cursor.0 as usize);
        let key = self.key_at(cursor.0 as usize);
        let mut past_self = false;
        for idx in self.index.positions(hash) {
            let slot = self.index.slot(idx);
            if slot == NONE_SLOT {
                return Cursor::NONE;
            }
            if !past_self {
                if slot == cursor.0 {
                    past_self = true;
                }
                continue;
            }
            if !self.deleted.is_deleted(slot as usize) && self.hash_at(slot as usize) == hash && self.key_at(slot as usize).equal(&key) {
                return Cursor(slot);
            }
        }
        Cursor::NONE
    }

    fn get_key(&self, cursor: Cursor) -> Value {
        self.key_at(cursor.0 as usize)
    }

    fn get_value(&self, cursor: Cursor) -> Value {
        self.value_at(cursor.0 as usize)
    }

    fn set(&self, cursor: Cursor, value: Value) -> Value {
        let values = self.values.set(cursor.0 as usize, value).expect("cursor produced by this map is in bounds");
        crate::node::map_value(Arc::new(Self {
            keys: self.keys.clone(),
            values,
            hashes: self.hashes.clone(),
            index: self.index.clone(),
            mode: self.mode,
            deleted: self.deleted.clone(),
            n_deleted: self.n_deleted,
            list_index: self.list_index.clone(),
        }))
    }

    fn add(&self, key: Value, value: Value) -> Value {
        let new_len = self.keys.len() + 1;
        let ascii9_word = key.payload().as_ascii9();
        let must_demote = self.mode == HashMode::Ascii9 && (ascii9_word.is_none() || new_len >= ASCII9_MAX_ENTRIES);
        if must_demote {
            let mut pairs = self.all_pairs();
            pairs.push((key, value));
            return crate::node::map_value(Arc::new(Self::try_build(&pairs, HashMode::Value, true).expect("value-hash build never exceeds its probe ceiling")));
        }

        let hash = hash_of(&key, self.mode);
        let capacity = capacity_for(new_len);
        let index = IndexTable::with_capacity(capacity);
        let mut hashes = Vec::with_capacity(new_len);
        for c in 0..self.keys.len() {
            let h = self.hash_at(c);
            hashes.push(h);
            index.insert(h, c as u64).expect("table sized for its own entries");
        }
        let new_cursor = self.keys.len() as u64;
        let probe_len = index.insert(hash, new_cursor).expect("table sized for its own entries");
        hashes.push(hash);

        if self.mode == HashMode::Ascii9 && probe_len > ASCII9_MAX_PROBE {
            let mut pairs = self.all_pairs();
            pairs.push((key, value));
            return crate::node::map_value(Arc::new(Self::try_build(&pairs, HashMode::Value, true).expect("value-hash build never exceeds its probe ceiling")));
        }

        crate::node::map_value(Arc::new(Self {
            keys: self.keys.append(&[key]),
            values: self.values.append(&[value]),
            hashes: PvRef::new(hashes),
            index: Arc::new(index),
            mode: self.mode,
            deleted: self.deleted.clone(),
            n_deleted: self.n_deleted,
            list_index: Arc::new(OnceLock::new()),
        }))
    }

    fn delete(&self, cursor: Cursor) -> Value {
        let deleted = self.deleted.marked(cursor.0 as usize);
        let n_deleted = self.n_deleted + 1;
        let live = self.keys.len() - n_deleted;
        if n_deleted * VACUUM_DENOMINATOR > live.max(1) * VACUUM_NUMERATOR {
            let pairs: Vec<(Value, Value)> = (0..self.keys.len())
                .filter(|&c| !deleted.is_deleted(c))
                .map(|c| (self.key_at(c), self.value_at(c)))
                .collect();
            return crate::node::map_value(Arc::new(Self::build(pairs)));
        }

        crate::node::map_value(Arc::new(Self {
            keys: self.keys.clone(),
            values: self.values.clone(),
            hashes: self.hashes.clone(),
            index: self.index.clone(),
            mode: self.mode,
            deleted,
            n_deleted,
            list_index: Arc::new(OnceLock::new()),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ListTrait for HashMap {
    fn len(&self) -> usize {
        2 * self.npairs()
    }

    fn index(&self, i: usize) -> Result<Value, UserError> {
        let cursor = self
            .physical_cursor(i / 2)
            .ok_or_else(|| UserError::index_out_of_bounds(i, self.len()))? as usize;
        Ok(if i % 2 == 0 { self.key_at(cursor) } else { self.value_at(cursor) })
    }

    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.len() {
            return Err(UserError::index_out_of_bounds(hi, self.len()));
        }
        Ok(rt_list::of_values((lo..hi).map(|i| self.index(i)).collect::<Result<Vec<_>, _>>()?))
    }

    fn append(&self, v: Value) -> Value {
        let mut elements: Vec<Value> = (0..self.len()).map(|i| self.index(i).expect("in bounds")).collect();
        elements.push(v);
        rt_list::of_values(elements)
    }

    fn concat(&self, other: &Value) -> Result<Value, UserError> {
        let mut elements: Vec<Value> = (0..self.len()).map(|i| self.index(i).expect("in bounds")).collect();
        let other_list = other.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
        for i in 0..other_list.len() {
            elements.push(other_list.index(i)?);
        }
        Ok(rt_list::of_values(elements))
    }

    fn remove(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.len() {
            return Err(UserError::index_out_of_bounds(hi, self.len()));
        }
        let mut elements = Vec::new();
        for i in 0..lo {
            elements.push(self.index(i)?);
        }
        for i in hi..self.len() {
            elements.push(self.index(i)?);
        }
        Ok(rt_list::of_values(elements))
    }

    fn set(&self, i: usize, v: Value) -> Result<Value, UserError> {
        if i >= self.len() {
            return Err(UserError::index_out_of_bounds(i, self.len()));
        }
        let mut elements: Vec<Value> = (0..self.len()).map(|j| self.index(j).expect("in bounds")).collect();
        elements[i] = v;
        Ok(rt_list::of_values(elements))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
