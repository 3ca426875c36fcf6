//! Browsable media tree for a room.
//!
//! Two levels: a root holding one "Favorites" folder, and that folder holding
//! one playable leaf per cached favorite. Any other path renders the root.

use serde::Serialize;

use crate::protocol_constants::{CTX_FAVORITE, CTX_LIBRARY, FAVORITES_CONTENT_ID};
use crate::vendor::types::{Favorite, Favorites};

/// Title of the favorites folder.
pub const FAVORITES_TITLE: &str = "Favorites";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaClass {
    Directory,
    Music,
    Channel,
}

/// One node of the browse tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseMedia {
    pub title: String,
    pub media_class: MediaClass,
    pub media_content_id: String,
    pub media_content_type: String,
    pub can_play: bool,
    pub can_expand: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub children: Vec<BrowseMedia>,
}

impl BrowseMedia {
    fn directory(title: &str, content_type: &str, content_id: &str) -> Self {
        Self {
            title: title.to_string(),
            media_class: MediaClass::Directory,
            media_content_id: content_id.to_string(),
            media_content_type: content_type.to_string(),
            can_play: false,
            can_expand: true,
            thumbnail: None,
            children: Vec::new(),
        }
    }

    fn favorite_leaf(favorite: &Favorite) -> Self {
        Self {
            title: favorite.title().to_string(),
            media_class: if favorite.is_music() {
                MediaClass::Music
            } else {
                MediaClass::Channel
            },
            media_content_id: favorite.fav_id.clone(),
            media_content_type: CTX_FAVORITE.to_string(),
            can_play: true,
            can_expand: false,
            thumbnail: favorite.image.clone(),
            children: Vec::new(),
        }
    }
}

/// Renders the root for a room: a directory titled `root_title` containing
/// the favorites folder.
pub fn browse_root(root_title: &str) -> BrowseMedia {
    let mut root = BrowseMedia::directory(root_title, CTX_LIBRARY, CTX_LIBRARY);
    root.children.push(BrowseMedia::directory(
        FAVORITES_TITLE,
        CTX_FAVORITE,
        FAVORITES_CONTENT_ID,
    ));
    root
}

/// Renders the favorites folder, leaves sorted case-insensitively by title.
pub fn browse_favorites(favorites: &Favorites) -> BrowseMedia {
    let mut folder = BrowseMedia::directory(FAVORITES_TITLE, CTX_FAVORITE, FAVORITES_CONTENT_ID);
    folder.children = favorites.values().map(BrowseMedia::favorite_leaf).collect();
    folder
        .children
        .sort_by_cached_key(|child| child.title.to_lowercase());
    folder
}

/// Resolves a browse request.
///
/// # Arguments
/// * `root_title` - Title of the room's root node
/// * `favorites` - Current cached favorites
/// * `media_content_type` - Requested category; `None` means the root
pub fn browse(root_title: &str, favorites: &Favorites, media_content_type: Option<&str>) -> BrowseMedia {
    match media_content_type {
        Some(CTX_FAVORITE) => browse_favorites(favorites),
        _ => browse_root(root_title),
    }
}
