//! Path-tracking cursor over schema-less JSON.
//!
//! The backend answers with positional arrays and no schema. Every read goes
//! through a [`Node`], which knows the path it was reached by, so a shape
//! change upstream surfaces as an `UnexpectedShape` error naming the exact
//! slot instead of a panic or a silently wrong value.

use serde_json::Value;

use super::error::FlightsError;

/// A borrowed JSON value together with the path used to reach it.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    /// Start a new path at `value`, labelled `label`.
    pub fn root(label: impl Into<String>, value: &'a Value) -> Self {
        Self {
            value,
            path: label.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    pub fn shape_error(&self, expected: &'static str) -> FlightsError {
        FlightsError::UnexpectedShape {
            path: self.path.clone(),
            expected,
        }
    }

    fn child(&self, index: usize, value: &'a Value) -> Node<'a> {
        Node {
            value,
            path: format!("{}[{}]", self.path, index),
        }
    }

    fn array(&self) -> Result<&'a Vec<Value>, FlightsError> {
        self.value.as_array().ok_or_else(|| self.shape_error("array"))
    }

    /// Element `index` of an array. The slot must exist but may be null.
    pub fn at(&self, index: usize) -> Result<Node<'a>, FlightsError> {
        let array = self.array()?;
        match array.get(index) {
            Some(value) => Ok(self.child(index, value)),
            None => Err(FlightsError::UnexpectedShape {
                path: format!("{}[{}]", self.path, index),
                expected: "array slot",
            }),
        }
    }

    /// Element `index` of an array, or `None` if it is null or past the end.
    pub fn get(&self, index: usize) -> Result<Option<Node<'a>>, FlightsError> {
        let array = self.array()?;
        Ok(array
            .get(index)
            .filter(|value| !value.is_null())
            .map(|value| self.child(index, value)))
    }

    /// Follow a sequence of indices with [`Node::at`].
    pub fn at_path(&self, indices: &[usize]) -> Result<Node<'a>, FlightsError> {
        let mut node = self.clone();
        for &index in indices {
            node = node.at(index)?;
        }
        Ok(node)
    }

    /// Follow a sequence of indices, stopping with `None` at the first null
    /// or missing slot.
    pub fn get_path(&self, indices: &[usize]) -> Result<Option<Node<'a>>, FlightsError> {
        let mut node = self.clone();
        for &index in indices {
            match node.get(index)? {
                Some(next) => node = next,
                None => return Ok(None),
            }
        }
        Ok(Some(node))
    }

    pub fn len(&self) -> Result<usize, FlightsError> {
        Ok(self.array()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, FlightsError> {
        Ok(self.array()?.is_empty())
    }

    /// All elements of an array, in order.
    pub fn items(&self) -> Result<Vec<Node<'a>>, FlightsError> {
        let array = self.array()?;
        Ok(array
            .iter()
            .enumerate()
            .map(|(index, value)| self.child(index, value))
            .collect())
    }

    pub fn str(&self) -> Result<&'a str, FlightsError> {
        self.value.as_str().ok_or_else(|| self.shape_error("string"))
    }

    pub fn number(&self) -> Result<f64, FlightsError> {
        self.value.as_f64().ok_or_else(|| self.shape_error("number"))
    }

    pub fn u32(&self) -> Result<u32, FlightsError> {
        self.value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| self.shape_error("unsigned integer"))
    }

    /// Parse a string slot that itself holds JSON.
    pub fn parse_embedded(&self) -> Result<Value, FlightsError> {
        let text = self.str()?;
        serde_json::from_str(text).map_err(|e| {
            FlightsError::malformed(format!("embedded JSON at {}: {}", self.path, e))
        })
    }
}
