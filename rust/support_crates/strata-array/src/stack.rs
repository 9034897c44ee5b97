//! LIFO adapter: push and pop map directly onto tail append and tail removal.

use strata_common::Result;

use crate::Array;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: Array<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Stack<T> {
        Stack { items: Array::new() }
    }

    /// Pushes `value`; returns its depth index from the bottom.
    pub fn push(&mut self, value: T) -> Result<usize> {
        self.items.append(value)
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items from bottom to top.
    pub fn as_slice(&self) -> &[T] {
        self.items.as_slice()
    }

    pub fn into_array(self) -> Array<T> {
        self.items
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Stack::new()
    }
}

impl<T> From<Array<T>> for Stack<T> {
    /// The last element of the array becomes the top of the stack.
    fn from(items: Array<T>) -> Self {
        Stack { items }
    }
}
