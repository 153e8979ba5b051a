//! XML Module
//!
//! Owned element tree for Doxygen output and the index walk that collects
//! every `<compounddef>`.

pub mod element;
pub mod reader;

pub use element::XmlElement;
pub use reader::{parse_file, parse_str};

use crate::error::Result;
use std::path::Path;

/// Read `index.xml` in `xml_dir` and return the `<compounddef>` elements of
/// every compound it lists, in index order.
pub fn load_index(xml_dir: &Path) -> Result<Vec<XmlElement>> {
    let index = parse_file(&xml_dir.join("index.xml"))?;

    let mut compounds = Vec::new();
    for compound in index.children_named("compound") {
        let refid = compound.require_attribute("refid")?;
        let document = parse_file(&xml_dir.join(format!("{}.xml", refid)))?;

        // A compound file may hold several definitions.
        compounds.extend(document.children_named("compounddef").cloned());
    }
    Ok(compounds)
}
