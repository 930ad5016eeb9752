//! Combine several templates into one.

use crate::chain::template::Template;

/// Join templates with `separator`, keeping every slot in order.
///
/// The last piece of item *k* and the first piece of item *k + 1* are glued
/// together with the separator in between; interior pieces are untouched.
/// This is how repeated `select` / `set` / `returning` calls collapse into
/// a single clause.
///
/// - no items: an empty template
/// - one item: that item, unchanged
pub fn merge(items: &[Template], separator: &str) -> Template {
    match items {
        [] => Template::empty(),
        [only] => only.clone(),
        _ => {
            let mut pieces = Vec::new();
            let mut slots = Vec::new();
            let mut tail: Option<String> = None;

            for item in items {
                let (item_pieces, item_slots) = item.clone().into_parts();
                let mut iter = item_pieces.into_iter();
                let head = iter.next().unwrap_or_default();
                tail = Some(match tail.take() {
                    None => head,
                    Some(prev) => format!("{prev}{separator}{head}"),
                });
                for piece in iter {
                    pieces.extend(tail.replace(piece));
                }
                slots.extend(item_slots);
            }
            pieces.extend(tail);

            Template::from_raw_parts(pieces, slots)
        }
    }
}
