//! Theme lookup passed explicitly to the engine.

use serde::{Deserialize, Serialize};

/// RGBA color type
pub type Color = [f32; 4];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub fire: Color,
    pub ring: Color,
    pub background: Color,
}

/// Ordered list of themes cycled through by theme swaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRegistry {
    pub themes: Vec<Theme>,
}

impl ThemeRegistry {
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Theme> {
        self.themes.get(index)
    }

    /// Index of the theme following `current`, wrapping around.
    pub fn next_index(&self, current: usize) -> usize {
        if self.themes.is_empty() {
            0
        } else {
            (current + 1) % self.themes.len()
        }
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self {
            themes: vec![
                Theme {
                    name: "ember".to_string(),
                    fire: [1.0, 0.55, 0.1, 1.0],
                    ring: [0.9, 0.8, 0.6, 1.0],
                    background: [0.08, 0.04, 0.02, 1.0],
                },
                Theme {
                    name: "frost".to_string(),
                    fire: [0.4, 0.8, 1.0, 1.0],
                    ring: [0.8, 0.9, 1.0, 1.0],
                    background: [0.02, 0.04, 0.1, 1.0],
                },
                Theme {
                    name: "verdant".to_string(),
                    fire: [0.5, 1.0, 0.4, 1.0],
                    ring: [0.85, 1.0, 0.8, 1.0],
                    background: [0.02, 0.08, 0.03, 1.0],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_index_wraps() {
        let registry = ThemeRegistry::default();
        assert_eq!(registry.next_index(0), 1);
        assert_eq!(registry.next_index(registry.len() - 1), 0);
        assert_eq!(ThemeRegistry { themes: vec![] }.next_index(3), 0);
    }
}
