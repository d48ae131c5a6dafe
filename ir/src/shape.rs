//! Shape utilities.
//!
//! Shapes are fully static: every dimension is a concrete `usize`. The helpers
//! here implement row-major addressing and NumPy broadcasting, both of which
//! are needed by constructor validation and by the interpreter.

use smallvec::{SmallVec, smallvec};

/// Shape type - sequence of concrete dimensions.
///
/// Uses SmallVec with inline capacity of 4 to avoid heap allocation for
/// common ranks.
pub type Shape = SmallVec<[usize; 4]>;

/// Number of elements of a shape; 1 for the empty (scalar) shape.
pub fn num_elements(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Row-major strides, in elements.
///
/// ```rust
/// # use veil_ir::shape::row_major_strides;
/// assert_eq!(row_major_strides(&[3, 4, 5]).as_slice(), &[20, 5, 1]);
/// ```
pub fn row_major_strides(shape: &[usize]) -> Shape {
    let mut strides: Shape = smallvec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

/// Convert a flat row-major offset into a multi-dimensional position.
pub fn unravel(mut flat: usize, shape: &[usize]) -> Shape {
    let mut position: Shape = smallvec![0; shape.len()];
    for axis in (0..shape.len()).rev() {
        if shape[axis] > 0 {
            position[axis] = flat % shape[axis];
            flat /= shape[axis];
        }
    }
    position
}

/// Convert a multi-dimensional position into a flat row-major offset.
pub fn ravel(position: &[usize], shape: &[usize]) -> usize {
    position.iter().zip(row_major_strides(shape)).map(|(p, s)| p * s).sum()
}

// =========================================================================
// Broadcasting Utilities
// =========================================================================

/// Compute the NumPy broadcast of several shapes.
///
/// Returns `None` if the shapes are incompatible.
///
/// ```rust
/// # use veil_ir::shape::broadcast_shapes;
/// assert_eq!(broadcast_shapes(&[&[2, 1], &[3]]).unwrap().as_slice(), &[2, 3]);
/// assert!(broadcast_shapes(&[&[2], &[3]]).is_none());
/// ```
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Option<Shape> {
    let rank = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut result: Shape = smallvec![1; rank];

    for shape in shapes {
        let pad = rank - shape.len();
        for (axis, &dim) in shape.iter().enumerate() {
            let slot = &mut result[pad + axis];
            match (*slot, dim) {
                (a, b) if a == b => {}
                (1, b) => *slot = b,
                (_, 1) => {}
                _ => return None,
            }
        }
    }

    Some(result)
}

/// Whether `from` can be broadcast to exactly `to`.
pub fn is_broadcastable_to(from: &[usize], to: &[usize]) -> bool {
    from.len() <= to.len()
        && from.iter().rev().zip(to.iter().rev()).all(|(&f, &t)| f == t || f == 1)
}

/// Map a position in a broadcast result back to the source position.
pub fn broadcast_source_position(position: &[usize], source_shape: &[usize]) -> Shape {
    let pad = position.len() - source_shape.len();
    source_shape.iter().enumerate().map(|(axis, &dim)| if dim == 1 { 0 } else { position[pad + axis] }).collect()
}
