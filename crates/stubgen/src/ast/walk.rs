use super::Cursor;

/// Decision returned by a [`walk`] visitor for every cursor it sees.
#[derive(Debug)]
pub enum Visit<T> {
    /// Descend into the children.
    Continue,
    /// Do not descend into the children.
    Skip,
    /// Record `T`, then descend into the children.
    Collect(T),
}

/// Depth-first pre-order walk starting at (and including) `root`.
///
/// Every traversal the engine needs is one visitor over this walk; results
/// come back in visiting order.
pub fn walk<C, T, F>(
    root: &C,
    mut visit: F,
) -> Vec<T>
where
    C: Cursor,
    F: FnMut(&C) -> Visit<T>,
{
    let mut out = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(cursor) = stack.pop() {
        match visit(&cursor) {
            Visit::Skip => continue,
            Visit::Continue => {},
            Visit::Collect(item) => out.push(item),
        }
        let mut children = cursor.children();
        children.reverse();
        stack.extend(children);
    }

    out
}
