// src/numbering.rs - Sequential numbers for distinct merged colors

use std::collections::HashMap;

use crate::color_sampling::Color;

/// Mapping from canonical color to its 1-based number, in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorNumberMap {
    order: Vec<Color>,
    numbers: HashMap<Color, u32>,
}

impl ColorNumberMap {
    /// Number every distinct color, scanning front to back
    pub fn from_colors<'a, I>(colors: I) -> Self
    where
        I: IntoIterator<Item = &'a Color>,
    {
        let mut map = Self::default();
        for color in colors {
            if !map.numbers.contains_key(color) {
                map.order.push(*color);
                map.numbers.insert(*color, map.order.len() as u32);
            }
        }
        map
    }

    pub fn number_of(&self, color: &Color) -> Option<u32> {
        self.numbers.get(color).copied()
    }

    /// Colors with their numbers, in ascending number order
    pub fn iter(&self) -> impl Iterator<Item = (&Color, u32)> {
        self.order.iter().zip(1..)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
