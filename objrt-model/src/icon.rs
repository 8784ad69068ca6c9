//! Icon blobs and the built-in per-kind icon registry.

use std::borrow::Cow;

use crate::kind::ObjectKind;

static BATCH_SYSTEM_ICON: &[u8] = include_bytes!("../assets/batch_system.png");
static PARTITION_ICON: &[u8] = include_bytes!("../assets/partition.png");
static JOB_ICON: &[u8] = include_bytes!("../assets/job.png");

/// Default PNG icon for a variant.
pub fn default_icon(kind: ObjectKind) -> &'static [u8] {
    match kind {
        ObjectKind::BatchSystem => BATCH_SYSTEM_ICON,
        ObjectKind::Partition => PARTITION_ICON,
        ObjectKind::Job => JOB_ICON,
    }
}

/// Opaque image blob attached to an object.
///
/// Objects built on the server borrow the embedded defaults; objects decoded
/// from the wire own their bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Icon(Cow<'static, [u8]>);

impl Icon {
    pub fn default_for(kind: ObjectKind) -> Self {
        Icon(Cow::Borrowed(default_icon(kind)))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Icon(Cow::Owned(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn every_kind_has_a_distinct_png() {
        for kind in ObjectKind::ALL {
            assert!(default_icon(kind).starts_with(PNG_MAGIC), "{kind}");
        }
        assert_ne!(
            default_icon(ObjectKind::BatchSystem),
            default_icon(ObjectKind::Partition)
        );
        assert_ne!(
            default_icon(ObjectKind::Partition),
            default_icon(ObjectKind::Job)
        );
    }

    #[test]
    fn owned_and_borrowed_icons_compare_by_bytes() {
        let borrowed = Icon::default_for(ObjectKind::Job);
        let owned = Icon::from_bytes(default_icon(ObjectKind::Job).to_vec());
        assert_eq!(borrowed, owned);
    }
}
