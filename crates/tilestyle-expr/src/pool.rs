use crate::color::Color;
use glam::{Vec2, Vec3, Vec4};
use std::marker::PhantomData;

#[derive(Debug)]
pub struct Slot<T> {
    index: usize,
    generation: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

#[derive(Debug)]
pub struct Lane<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> Default for Lane<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
        }
    }
}

impl<T: Copy> Lane<T> {
    fn push(&mut self, value: T) -> usize {
        let index = self.cursor;
        match self.items.get_mut(index) {
            Some(item) => *item = value,
            None => self.items.push(value),
        }
        self.cursor += 1;
        index
    }

    fn get(&self, index: usize) -> Option<T> {
        if index < self.cursor {
            self.items.get(index).copied()
        } else {
            None
        }
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolCapacity {
    pub colors: usize,
    pub vec2s: usize,
    pub vec3s: usize,
    pub vec4s: usize,
}

#[derive(Debug, Default)]
pub struct ScratchPool {
    colors: Lane<Color>,
    vec2s: Lane<Vec2>,
    vec3s: Lane<Vec3>,
    vec4s: Lane<Vec4>,
    generation: u64,
}

pub trait Pooled: Copy + Default {
    fn lane(pool: &ScratchPool) -> &Lane<Self>;
    fn lane_mut(pool: &mut ScratchPool) -> &mut Lane<Self>;
}

macro_rules! pooled {
    ($ty:ty, $field:ident) => {
        impl Pooled for $ty {
            fn lane(pool: &ScratchPool) -> &Lane<Self> {
                &pool.$field
            }

            fn lane_mut(pool: &mut ScratchPool) -> &mut Lane<Self> {
                &mut pool.$field
            }
        }
    };
}

pooled!(Color, colors);
pooled!(Vec2, vec2s);
pooled!(Vec3, vec3s);
pooled!(Vec4, vec4s);

impl ScratchPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new generation. Slots handed out earlier must not be loaded afterwards.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.colors.rewind();
        self.vec2s.rewind();
        self.vec3s.rewind();
        self.vec4s.rewind();
    }

    pub fn store<T: Pooled>(&mut self, value: T) -> Slot<T> {
        let generation = self.generation;
        let index = T::lane_mut(self).push(value);
        Slot {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    pub fn load<T: Pooled>(&self, slot: Slot<T>) -> T {
        debug_assert_eq!(
            slot.generation, self.generation,
            "scratch slot used after its generation ended"
        );
        T::lane(self).get(slot.index).unwrap_or_default()
    }

    pub fn capacity(&self) -> PoolCapacity {
        PoolCapacity {
            colors: self.colors.items.len(),
            vec2s: self.vec2s.items.len(),
            vec3s: self.vec3s.items.len(),
            vec4s: self.vec4s.items.len(),
        }
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod tests;
