use std::{borrow::Borrow, fmt::Display};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;

/// Names an effect or music clip, as used by cue sheets and sound banks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(SmartString);

impl ClipId {
    pub fn new(id: &str) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ClipId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for ClipId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps clip ids to playable clip resources.
///
/// A missing id is a normal condition for the callers, lookups return `None` for it.
/// Iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct ClipRegistry<C> {
    clips: IndexMap<ClipId, C>,
}

impl<C> ClipRegistry<C> {
    pub fn new() -> Self {
        Self {
            clips: IndexMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&C> {
        self.clips.get(id)
    }

    /// Returns the registry's own copy of the id along with the clip.
    pub fn get_entry(&self, id: &str) -> Option<(&ClipId, &C)> {
        self.clips.get_key_value(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.clips.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ClipId> {
        self.clips.keys()
    }

    /// Converts every clip, stopping at the first failure.
    ///
    /// Used to turn a registry of file paths into a registry of loaded clips.
    pub fn try_map<D, E>(
        &self,
        mut f: impl FnMut(&ClipId, &C) -> Result<D, E>,
    ) -> Result<ClipRegistry<D>, E> {
        let clips = self
            .clips
            .iter()
            .map(|(id, clip)| Ok((id.clone(), f(id, clip)?)))
            .collect::<Result<IndexMap<_, _>, E>>()?;
        Ok(ClipRegistry { clips })
    }
}

impl<C> Default for ClipRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, I: Into<ClipId>> FromIterator<(I, C)> for ClipRegistry<C> {
    fn from_iter<T: IntoIterator<Item = (I, C)>>(iter: T) -> Self {
        Self {
            clips: iter
                .into_iter()
                .map(|(id, clip)| (id.into(), clip))
                .collect(),
        }
    }
}

impl<C> From<IndexMap<ClipId, C>> for ClipRegistry<C> {
    fn from(clips: IndexMap<ClipId, C>) -> Self {
        Self { clips }
    }
}
