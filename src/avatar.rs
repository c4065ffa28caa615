//! Avatar badges: an image marker when the picture exists, the name's initial otherwise.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Marker drawn in place of an avatar image the terminal cannot show.
pub const IMAGE_MARKER: char = '◉';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarBadge {
    Image,
    Initial(char),
}

impl AvatarBadge {
    pub fn glyph(self) -> char {
        match self {
            AvatarBadge::Image => IMAGE_MARKER,
            AvatarBadge::Initial(c) => c,
        }
    }
}

/// First character of a display name, `?` when there is none.
pub fn initial(name: &str) -> char {
    name.chars().next().unwrap_or('?')
}

/// Resolves image references against an assets directory, caching lookups
/// so drawing a frame does not hit the filesystem.
#[derive(Debug)]
pub struct AvatarResolver {
    assets_dir: PathBuf,
    cache: HashMap<String, bool>,
}

impl AvatarResolver {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            cache: HashMap::new(),
        }
    }

    pub fn badge(&mut self, name: &str, reference: &str) -> AvatarBadge {
        if self.is_available(reference) {
            AvatarBadge::Image
        } else {
            AvatarBadge::Initial(initial(name))
        }
    }

    fn is_available(&mut self, reference: &str) -> bool {
        if let Some(&found) = self.cache.get(reference) {
            return found;
        }

        let found = !reference.is_empty() && self.resolve(reference).is_file();
        if !found {
            tracing::debug!(reference, "avatar image unavailable, using initial");
        }
        self.cache.insert(reference.to_string(), found);
        found
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        // References are site-absolute ("/placeholder-user.jpg"); anchor them at the assets dir.
        let relative = Path::new(reference.trim_start_matches('/'));
        self.assets_dir.join(relative)
    }
}
