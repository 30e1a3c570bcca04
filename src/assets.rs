//! Image catalog
//!
//! Images load asynchronously and may never arrive. The catalog tracks each
//! slot as Pending, Loaded or Failed; anything not Loaded is drawn with the
//! key's placeholder colour, or skipped for purely decorative art.

use std::fmt;

/// Every image the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Background,
    Player,
    Heart,
    Platform,
    Pill,
    SparkleViolet,
    SparkleGold,
    Seashell,
    Starfish,
}

impl AssetKey {
    pub const ALL: [AssetKey; 9] = [
        AssetKey::Background,
        AssetKey::Player,
        AssetKey::Heart,
        AssetKey::Platform,
        AssetKey::Pill,
        AssetKey::SparkleViolet,
        AssetKey::SparkleGold,
        AssetKey::Seashell,
        AssetKey::Starfish,
    ];

    /// Path relative to the page
    pub fn path(self) -> &'static str {
        match self {
            AssetKey::Background => "assets/background_tile.png",
            AssetKey::Player => "assets/cat_pixel.png",
            AssetKey::Heart => "assets/heart_pixel.png",
            AssetKey::Platform => "assets/platform.png",
            AssetKey::Pill => "assets/pill.png",
            AssetKey::SparkleViolet => "assets/sparkle_violet.png",
            AssetKey::SparkleGold => "assets/sparkle_gold.png",
            AssetKey::Seashell => "assets/seashell.png",
            AssetKey::Starfish => "assets/starfish.png",
        }
    }

    /// RGBA colour drawn in place of a missing image; `None` draws nothing
    pub fn placeholder(self) -> Option<[f32; 4]> {
        match self {
            AssetKey::Background => Some(rgb(0x87, 0xce, 0xfa)),
            AssetKey::Player => Some(rgb(0xff, 0xa5, 0x00)),
            AssetKey::Heart => Some(rgb(0xff, 0x00, 0x00)),
            AssetKey::Platform => Some(rgb(0x8b, 0x5a, 0x2b)),
            AssetKey::Pill => Some(rgb(0x8b, 0x00, 0x00)),
            AssetKey::SparkleViolet
            | AssetKey::SparkleGold
            | AssetKey::Seashell
            | AssetKey::Starfish => None,
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Anything that knows its pixel size
pub trait ImageHandle {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
}

impl ImageHandle for glam::Vec2 {
    fn width(&self) -> f32 {
        self.x
    }

    fn height(&self) -> f32 {
        self.y
    }
}

/// Load state of one image
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSlot<H> {
    Pending,
    Loaded(H),
    Failed,
}

/// Counts per load state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    pub pending: usize,
    pub loaded: usize,
    pub failed: usize,
}

impl Readiness {
    /// Nothing left in flight
    pub fn settled(&self) -> bool {
        self.pending == 0
    }
}

/// Named image handles, generic over the backend's handle type
#[derive(Debug, Clone)]
pub struct AssetCatalog<H> {
    slots: Vec<AssetSlot<H>>,
}

impl<H> Default for AssetCatalog<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> AssetCatalog<H> {
    /// Every key starts Pending
    pub fn new() -> Self {
        Self {
            slots: AssetKey::ALL.iter().map(|_| AssetSlot::Pending).collect(),
        }
    }

    // `ALL` lists the variants in declaration order
    fn index(key: AssetKey) -> usize {
        key as usize
    }

    pub fn slot(&self, key: AssetKey) -> &AssetSlot<H> {
        &self.slots[Self::index(key)]
    }

    /// Handle for a loaded image
    pub fn get(&self, key: AssetKey) -> Option<&H> {
        match self.slot(key) {
            AssetSlot::Loaded(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_loaded(&self, key: AssetKey) -> bool {
        self.get(key).is_some()
    }

    pub fn mark_loaded(&mut self, key: AssetKey, handle: H) {
        log::debug!("Loaded {}", key);
        self.slots[Self::index(key)] = AssetSlot::Loaded(handle);
    }

    /// Record a failed load; warns the first time only
    pub fn mark_failed(&mut self, key: AssetKey) {
        let slot = &mut self.slots[Self::index(key)];
        if !matches!(slot, AssetSlot::Failed) {
            match key.placeholder() {
                Some(_) => log::warn!("Could not load {}, using placeholder", key),
                None => log::warn!("Could not load {}, skipping it", key),
            }
        }
        *slot = AssetSlot::Failed;
    }

    pub fn readiness(&self) -> Readiness {
        self.slots
            .iter()
            .fold(Readiness::default(), |mut counts, slot| {
                match slot {
                    AssetSlot::Pending => counts.pending += 1,
                    AssetSlot::Loaded(_) => counts.loaded += 1,
                    AssetSlot::Failed => counts.failed += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_starts_pending() {
        let catalog: AssetCatalog<u32> = AssetCatalog::new();
        let readiness = catalog.readiness();
        assert_eq!(readiness.pending, AssetKey::ALL.len());
        assert!(!readiness.settled());
        assert!(catalog.get(AssetKey::Player).is_none());
    }

    #[test]
    fn test_loaded_and_failed_slots() {
        let mut catalog = AssetCatalog::new();
        catalog.mark_loaded(AssetKey::Heart, 7u32);
        catalog.mark_failed(AssetKey::Pill);
        catalog.mark_failed(AssetKey::Pill);

        assert_eq!(catalog.get(AssetKey::Heart), Some(&7));
        assert!(catalog.get(AssetKey::Pill).is_none());
        assert_eq!(catalog.slot(AssetKey::Pill), &AssetSlot::Failed);

        let readiness = catalog.readiness();
        assert_eq!(readiness.loaded, 1);
        assert_eq!(readiness.failed, 1);
        assert_eq!(readiness.pending, AssetKey::ALL.len() - 2);
    }

    #[test]
    fn test_settles_once_all_resolved() {
        let mut catalog = AssetCatalog::new();
        for (i, key) in AssetKey::ALL.iter().enumerate() {
            if i % 2 == 0 {
                catalog.mark_loaded(*key, i);
            } else {
                catalog.mark_failed(*key);
            }
        }
        assert!(catalog.readiness().settled());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            AssetKey::Background.placeholder(),
            Some([0x87 as f32 / 255.0, 0xce as f32 / 255.0, 0xfa as f32 / 255.0, 1.0])
        );
        assert!(AssetKey::Platform.placeholder().is_some());
        assert!(AssetKey::Player.placeholder().is_some());
        assert!(AssetKey::Seashell.placeholder().is_none());
        assert!(AssetKey::SparkleGold.placeholder().is_none());
    }

    #[test]
    fn test_paths_are_unique() {
        let mut paths: Vec<_> = AssetKey::ALL.iter().map(|k| k.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), AssetKey::ALL.len());
    }
}
