use std::fmt::{self, Debug, Display};
use std::ops::Deref;

use interner::global::{GlobalString, StringPool};

static POOL: StringPool = StringPool::new();

/// The name of a widget or style property.
///
/// Equal names share one allocation, so clones are a reference count bump and
/// comparisons never look at the characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Name(GlobalString);

impl Name {
    /// Interns `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(POOL.get(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.as_str(), f)
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self(POOL.get(name))
    }
}

#[test]
fn interned_names_are_shared() {
    let literal = Name::new("button1");
    let owned = Name::from(format!("button{}", 1));
    assert_eq!(literal, owned);
    assert_ne!(literal, Name::from("button2"));
    assert_eq!(literal.as_str(), "button1");
    assert_eq!(format!("{literal} {literal:?}"), "button1 \"button1\"");
}
