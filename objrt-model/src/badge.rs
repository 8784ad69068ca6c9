use std::fmt::{self, Display};

/// Short display string summarizing an object, rendered by viewers on top
/// of the icon.
///
/// "No badge" is an explicit value. On the wire it is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Badge {
    #[default]
    None,
    Text(String),
}

impl Badge {
    /// Badge for a live child count; zero is suppressed.
    pub fn count(count: u64) -> Self {
        if count == 0 {
            Badge::None
        } else {
            Badge::Text(count.to_string())
        }
    }

    /// Builds a badge from its wire form, mapping `""` to [`Badge::None`].
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Badge::None
        } else {
            Badge::Text(text)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Badge::None => "",
            Badge::Text(text) => text,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Badge::None)
    }
}

impl Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
