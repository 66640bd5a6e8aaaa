//! Index-path addressing of subtrees.
//!
//! A [`Location`] is computed against one tree instance and stays valid only
//! until the shape of an ancestor on its path changes. [`overwrite`] replaces a
//! child in place and leaves every other location intact; [`insert`] shifts all
//! later siblings and invalidates any location that passes through them.

use std::fmt;

use crate::{
    ast::{Element, Node},
    error::Error,
};

/// A non-empty path of child indices from a root node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(Vec<usize>);

impl Location {
    /// Returns `None` for an empty path.
    pub fn new(path: Vec<usize>) -> Option<Self> {
        if path.is_empty() { None } else { Some(Location(path)) }
    }

    pub fn single(index: usize) -> Self {
        Location(vec![index])
    }

    /// Prepends `index`, giving the path as seen from one level up.
    pub fn prefixed(mut self, index: usize) -> Self {
        self.0.insert(0, index);
        self
    }

    pub fn path(&self) -> &[usize] {
        &self.0
    }

    fn split_last(&self) -> (&[usize], usize) {
        match self.0.split_last() {
            Some((last, parents)) => (parents, *last),
            None => (&[], 0),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|idx| idx.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

fn parent<'a>(tree: &'a Node, location: &Location) -> Result<(&'a Node, usize), Error> {
    let (parents, last) = location.split_last();
    let mut node = tree;
    for &idx in parents {
        node = node
            .child(idx)
            .and_then(Element::as_node)
            .ok_or_else(|| Error::InvalidLocation(location.clone()))?;
    }
    Ok((node, last))
}

fn parent_mut<'a>(
    tree: &'a mut Node,
    location: &Location,
) -> Result<(&'a mut Node, usize), Error> {
    let (parents, last) = location.split_last();
    let mut node = tree;
    for &idx in parents {
        node = node
            .child_mut(idx)
            .and_then(Element::as_node_mut)
            .ok_or_else(|| Error::InvalidLocation(location.clone()))?;
    }
    Ok((node, last))
}

/// Returns the element addressed by `location`.
pub fn resolve<'a>(tree: &'a Node, location: &Location) -> Result<&'a Element, Error> {
    let (node, last) = parent(tree, location)?;
    node.child(last).ok_or_else(|| Error::InvalidLocation(location.clone()))
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(
    tree: &'a mut Node,
    location: &Location,
) -> Result<&'a mut Element, Error> {
    let (node, last) = parent_mut(tree, location)?;
    node.child_mut(last).ok_or_else(|| Error::InvalidLocation(location.clone()))
}

/// Replaces the element at `location`, returning the one it displaced.
///
/// The replacement is not checked against the old element's shape; callers
/// swap like for like (a parenthesized query for a parenthesized query).
pub fn overwrite(
    tree: &mut Node,
    location: &Location,
    replacement: Element,
) -> Result<Element, Error> {
    let slot = resolve_mut(tree, location)?;
    Ok(std::mem::replace(slot, replacement))
}

/// Inserts `child` at `index` in `parent`, shifting later children right.
///
/// `index == parent.len()` appends.
pub fn insert(parent: &mut Node, index: usize, child: Element) -> Result<(), Error> {
    if index > parent.len() {
        return Err(Error::InvalidLocation(Location::single(index)));
    }
    parent.children.insert(index, child);
    Ok(())
}
