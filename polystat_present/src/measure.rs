// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement and its cache.
//!
//! Font fitting measures the same strings at the same sizes over and over while
//! the user pans, so measurements go through a bounded [`MeasureCache`] in
//! front of the host's [`TextMeasurer`].
//!
//! ## Example
//!
//! ```rust
//! use polystat_present::{MeasureCache, MonospaceMeasurer, TextMeasurer};
//!
//! let mut cache = MeasureCache::new(MonospaceMeasurer::default(), 2);
//! let a = cache.measure("cpu", 10.0);
//! assert_eq!(cache.measure("cpu", 10.0), a);
//! assert_eq!(cache.stats().hits, 1);
//!
//! // Oldest entries are evicted first.
//! cache.measure("mem", 10.0);
//! cache.measure("disk", 10.0);
//! assert_eq!(cache.len(), 2);
//! assert!(!cache.contains("cpu", 10.0));
//! ```

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use hashbrown::{Equivalent, HashMap};

/// Measures the advance width of a single line of text.
pub trait TextMeasurer {
    /// Width of `text` set at `font_size`, in the same unit as `font_size`.
    fn measure(&mut self, text: &str, font_size: f64) -> f64;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &mut M {
    fn measure(&mut self, text: &str, font_size: f64) -> f64 {
        (**self).measure(text, font_size)
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for Box<M> {
    fn measure(&mut self, text: &str, font_size: f64) -> f64 {
        (**self).measure(text, font_size)
    }
}

/// Approximates every character as a fixed fraction of the font size.
///
/// Useful for headless layout and tests; real hosts measure with their font
/// stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasurer {
    /// Advance of one character per unit of font size.
    pub advance: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&mut self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.advance
    }
}

/// Default number of cached measurements.
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Key {
    text: String,
    size_bits: u64,
}

/// Borrowed form of [`Key`], hashed identically, so lookups do not allocate.
struct KeyRef<'a> {
    text: &'a str,
    size_bits: u64,
}

impl Hash for KeyRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.size_bits.hash(state);
    }
}

impl Equivalent<Key> for KeyRef<'_> {
    fn equivalent(&self, key: &Key) -> bool {
        self.size_bits == key.size_bits && self.text == key.text
    }
}

/// Hit and miss counters of a [`MeasureCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups forwarded to the inner measurer.
    pub misses: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
}

/// Bounded memo of `(text, font size)` measurements with oldest-first
/// eviction.
#[derive(Clone, Debug)]
pub struct MeasureCache<M> {
    inner: M,
    entries: HashMap<Key, f64>,
    order: VecDeque<Key>,
    capacity: usize,
    stats: CacheStats,
}

impl<M: TextMeasurer> MeasureCache<M> {
    /// Wraps `inner`, keeping at most `capacity` measurements (at least one).
    pub fn new(inner: M, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            stats: CacheStats::default(),
        }
    }

    /// Wraps `inner` with [`DEFAULT_CACHE_CAPACITY`].
    pub fn with_default_capacity(inner: M) -> Self {
        Self::new(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached measurements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `(text, font_size)` is cached.
    #[must_use]
    pub fn contains(&self, text: &str, font_size: f64) -> bool {
        self.entries.contains_key(&KeyRef {
            text,
            size_bits: font_size.to_bits(),
        })
    }

    /// Counters since creation or the last [`clear`](Self::clear).
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// The wrapped measurer.
    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.inner
    }

    /// Drops all entries, for example after a font change.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats = CacheStats::default();
    }
}

impl<M: TextMeasurer> TextMeasurer for MeasureCache<M> {
    fn measure(&mut self, text: &str, font_size: f64) -> f64 {
        let size_bits = font_size.to_bits();
        if let Some(&width) = self.entries.get(&KeyRef { text, size_bits }) {
            self.stats.hits += 1;
            return width;
        }
        self.stats.misses += 1;
        let width = self.inner.measure(text, font_size);
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            self.stats.evictions += 1;
        }
        let key = Key {
            text: text.to_owned(),
            size_bits,
        };
        self.order.push_back(key.clone());
        self.entries.insert(key, width);
        width
    }
}
