//! A keyed collection of wires forming one layer of a chip

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::wire::Wire;

/// The layout of one layer of wires in a chip
///
/// A [`WireLayer`] is built once from input and is read-only thereafter;
/// insertion order is not significant, only that names are unique.
#[derive(Debug, Default)]
pub struct WireLayer {
    wires: HashMap<String, Wire>,
}

impl WireLayer {
    /// Creates an empty layer layout
    pub fn new() -> Self {
        Self {
            wires: HashMap::new(),
        }
    }

    /// Adds a wire to the layout
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if `name` is already present in this
    /// layer, or [`Error::InvalidGeometry`] if the coordinates describe
    /// neither a horizontal nor a vertical segment.
    pub fn add(&mut self, name: impl Into<String>, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let name = name.into();
        if self.wires.contains_key(&name) {
            return Err(Error::DuplicateName(name));
        }
        let wire = Wire::new(name.clone(), x1, y1, x2, y2)?;
        self.wires.insert(name, wire);
        Ok(())
    }

    /// The number of wires stored in this layer
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// True if the layer holds no wires
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Looks up a wire by name
    pub fn get(&self, name: &str) -> Option<&Wire> {
        self.wires.get(name)
    }

    /// An iterator over the wires stored in this layer, in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_iter() {
        let mut layer = WireLayer::new();
        layer.add("a", 0.0, 0.0, 10.0, 0.0).unwrap();
        layer.add("b", 5.0, -5.0, 5.0, 5.0).unwrap();

        assert_eq!(layer.len(), 2);
        let mut names: Vec<&str> = layer.iter().map(Wire::name).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn rejects_duplicate_name() {
        let mut layer = WireLayer::new();
        layer.add("a", 0.0, 0.0, 10.0, 0.0).unwrap();
        let result = layer.add("a", 0.0, 1.0, 10.0, 1.0);
        assert!(matches!(result, Err(Error::DuplicateName(ref n)) if n == "a"));
    }

    #[test]
    fn rejects_invalid_geometry() {
        let mut layer = WireLayer::new();
        let result = layer.add("a", 0.0, 0.0, 10.0, 10.0);
        assert!(matches!(result, Err(Error::InvalidGeometry { .. })));
        assert!(layer.is_empty());
    }
}
