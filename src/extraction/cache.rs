//! Decoded image cache
//!
//! Regenerating themes for the same wallpaper (with a new variation seed)
//! should not decode the image again. The cache holds downsampled pixel
//! buffers keyed by [`ImageSource::cache_key`](super::ImageSource::cache_key).
//! Entries are released explicitly with [`DecodedImageCache::release`] or
//! evicted least-recently-used once the capacity is reached.

use image::RgbaImage;
use log::trace;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Default number of decoded buffers kept alive
pub const DEFAULT_CACHE_CAPACITY: usize = 4;

/// Bounded LRU of downsampled pixel buffers
#[derive(Debug)]
pub struct DecodedImageCache {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, Arc<RgbaImage>>,
}

impl DecodedImageCache {
    /// Create a cache holding at most `capacity` buffers (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            entries: HashMap::new(),
        }
    }

    /// Look up a buffer and mark it most recently used
    pub fn get(&mut self, key: &str) -> Option<Arc<RgbaImage>> {
        let pixels = self.entries.get(key)?.clone();
        self.touch(key);
        Some(pixels)
    }

    /// Insert a buffer, evicting the least recently used entry when full
    pub fn put(&mut self, key: String, pixels: Arc<RgbaImage>) {
        if self.entries.insert(key.clone(), pixels).is_some() {
            self.touch(&key);
            return;
        }

        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(old) = self.order.pop_front() {
                trace!("Evicting decoded image {}", old);
                self.entries.remove(&old);
            }
        }
    }

    /// Drop a cached buffer; returns whether it was present
    pub fn release(&mut self, key: &str) -> bool {
        self.order.retain(|k| k != key);
        self.entries.remove(key).is_some()
    }

    /// Drop every cached buffer
    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

impl Default for DecodedImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
