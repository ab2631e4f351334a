use std::io::Write;

use crate::scroll_index::ScrollIndex;

/// Writes the whole collection, unpublished posts included, as the JSON
/// artifact consumed by the site. Order is the listing order.
pub fn write_json<W: Write>(index: &ScrollIndex, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, index.all())
}
