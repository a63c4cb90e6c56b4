//! Survey tree walker.
//!
//! The survey sheet stores a form tree as a pre-order walk: a group is a
//! `begin...` row, its children's rows, then an `end...` row. [`decode`]
//! rebuilds the tree by counting open markers; [`encode`] walks the tree
//! back into rows and works out the sheet header.

pub mod decode;
pub mod encode;

pub use decode::decode_survey;
pub use encode::{encode_survey, EncodedSurvey};

/// Returns `true` for type cells that open a group or repeat.
#[inline]
pub(crate) fn is_begin(type_cell: &str) -> bool {
    type_cell.starts_with("begin")
}

/// Returns `true` for type cells that close a group or repeat.
#[inline]
pub(crate) fn is_end(type_cell: &str) -> bool {
    type_cell.starts_with("end")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert!(is_begin("begin_group"));
        assert!(is_begin("begin repeat"));
        assert!(is_end("end_group"));
        assert!(!is_begin("text"));
        assert!(!is_end("integer"));
    }
}
