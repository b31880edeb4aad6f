//! Z-index assignment for elements.
//!
//! Raising or lowering one element only ever touches that element, so the
//! sequence can develop gaps or go below 1. Contiguity is checked by
//! [`crate::document::validate`]; [`normalize`] is the explicit way to
//! restore it.

use crate::element::Element;

/// Highest z-index in use, if any.
pub fn max_z_index(elements: &[Element]) -> Option<i64> {
    elements.iter().map(Element::z_index).max()
}

/// Lowest z-index in use, if any.
pub fn min_z_index(elements: &[Element]) -> Option<i64> {
    elements.iter().map(Element::z_index).min()
}

/// z-index for a newly created element: one above the current maximum, or 1.
/// Saturates at `i64::MAX`.
pub fn next_z_index(elements: &[Element]) -> i64 {
    max_z_index(elements).unwrap_or(0).saturating_add(1)
}

/// Move an element above every other. Returns false if `id` isn't present
/// or the maximum z-index is already `i64::MAX`.
pub fn bring_to_front(elements: &mut [Element], id: &str) -> bool {
    let Some(z) = max_z_index(elements).and_then(|max| max.checked_add(1)) else {
        log::warn!("Cannot bring {} to front", id);
        return false;
    };
    set_z_index(elements, id, z)
}

/// Move an element below every other. Returns false if `id` isn't present
/// or the minimum z-index is already `i64::MIN`.
pub fn send_to_back(elements: &mut [Element], id: &str) -> bool {
    let Some(z) = min_z_index(elements).and_then(|min| min.checked_sub(1)) else {
        log::warn!("Cannot send {} to back", id);
        return false;
    };
    set_z_index(elements, id, z)
}

/// Reassign z-indices to `1..=n` keeping the current stacking order.
/// Ties keep store order.
pub fn normalize(elements: &mut [Element]) {
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by_key(|&i| elements[i].z_index());
    for (rank, index) in order.into_iter().enumerate() {
        let el = &elements[index];
        let z = rank as i64 + 1;
        if el.z_index() != z {
            let mut position = el.position.clone();
            position.z_index = z;
            let updated = el.with_position(position);
            elements[index] = updated;
        }
    }
}

/// Indices of `elements` in paint order (back to front).
pub fn paint_order(elements: &[Element]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by_key(|&i| elements[i].z_index());
    order
}

fn set_z_index(elements: &mut [Element], id: &str, z_index: i64) -> bool {
    let Some(slot) = elements.iter_mut().find(|e| e.id == id) else {
        return false;
    };
    let mut position = slot.position.clone();
    position.z_index = z_index;
    *slot = slot.with_position(position);
    true
}
