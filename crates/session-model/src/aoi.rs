//! Areas of interest grouped by page.
//!
//! The registry maps a page key (`"home"`, `"cart"`, ...) to the ordered
//! list of rectangles defined for that page. Every lookup names its page
//! explicitly through [`AoiRef`]; there is no "current page" state.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// An axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aoi {
    /// Display name; may be empty.
    pub name: String,
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub width: f64,
    pub height: f64,
}

impl Aoi {
    /// Build an AOI from its top-left corner and size.
    ///
    /// Width and height must be finite and non-negative.
    pub fn new(
        name: impl Into<String>,
        x_min: f64,
        y_min: f64,
        width: f64,
        height: f64,
    ) -> SessionResult<Self> {
        let name = name.into();
        for (label, value) in [
            ("x", x_min),
            ("y", y_min),
            ("width", width),
            ("height", height),
        ] {
            if !value.is_finite() {
                return Err(SessionError::InvalidAoi {
                    name,
                    message: format!("{label} must be finite"),
                });
            }
        }
        if width < 0.0 || height < 0.0 {
            return Err(SessionError::InvalidAoi {
                name,
                message: format!("negative size {width}x{height}"),
            });
        }

        Ok(Self {
            name,
            x_min,
            y_min,
            x_max: x_min + width,
            y_max: y_min + height,
            width,
            height,
        })
    }

    /// Closed-interval containment: points on any edge are inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }
}

/// Reference to one AOI: the page it lives on and its definition index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AoiRef {
    pub page: String,
    pub index: usize,
}

impl AoiRef {
    pub fn new(page: impl Into<String>, index: usize) -> Self {
        Self {
            page: page.into(),
            index,
        }
    }
}

impl std::fmt::Display for AoiRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.page, self.index)
    }
}

/// On-disk AOI entry (top-left corner plus size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AoiDefinition {
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// On-disk layout file: page key to ordered AOI definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AoiLayout {
    pub pages: BTreeMap<String, Vec<AoiDefinition>>,
}

/// Page-keyed AOI store.
#[derive(Debug, Clone, Default)]
pub struct AoiRegistry {
    pages: BTreeMap<String, Vec<Aoi>>,
}

impl AoiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regions used by the reference storefront analysis: logo, side menu
    /// and main content on the `home` page.
    pub fn storefront_default() -> Self {
        let mut registry = Self::new();
        for (name, x, y, w, h) in [
            ("logo", 50.0, 50.0, 200.0, 100.0),
            ("menu", 0.0, 150.0, 200.0, 400.0),
            ("content", 250.0, 150.0, 600.0, 400.0),
        ] {
            // sizes above are non-negative and finite
            if let Ok(aoi) = Aoi::new(name, x, y, w, h) {
                registry.push(DEFAULT_PAGE, aoi);
            }
        }
        registry
    }

    /// Register a page with no AOIs yet. Existing pages are left untouched.
    pub fn define_page(&mut self, page: impl Into<String>) {
        self.pages.entry(page.into()).or_default();
    }

    /// Append an AOI to `page`, creating the page if needed.
    pub fn define_aoi(
        &mut self,
        page: impl Into<String>,
        name: impl Into<String>,
        x_min: f64,
        y_min: f64,
        width: f64,
        height: f64,
    ) -> SessionResult<AoiRef> {
        let aoi = Aoi::new(name, x_min, y_min, width, height)?;
        Ok(self.push(page, aoi))
    }

    fn push(&mut self, page: impl Into<String>, aoi: Aoi) -> AoiRef {
        let page = page.into();
        let aois = self.pages.entry(page.clone()).or_default();
        aois.push(aoi);
        AoiRef::new(page, aois.len() - 1)
    }

    /// All AOIs of `page` in definition order.
    pub fn get_all_aois(&self, page: &str) -> SessionResult<&[Aoi]> {
        self.pages
            .get(page)
            .map(Vec::as_slice)
            .ok_or_else(|| SessionError::PageNotFound {
                page: page.to_string(),
            })
    }

    pub fn get_aoi(&self, aoi: &AoiRef) -> SessionResult<&Aoi> {
        self.get_all_aois(&aoi.page)?
            .get(aoi.index)
            .ok_or_else(|| SessionError::AoiNotFound {
                page: aoi.page.clone(),
                index: aoi.index,
            })
    }

    pub fn is_point_in_aoi(&self, x: f64, y: f64, aoi: &AoiRef) -> SessionResult<bool> {
        Ok(self.get_aoi(aoi)?.contains(x, y))
    }

    /// References to every AOI of `page`, in definition order.
    pub fn aoi_refs(&self, page: &str) -> SessionResult<Vec<AoiRef>> {
        let count = self.get_all_aois(page)?.len();
        Ok((0..count).map(|index| AoiRef::new(page, index)).collect())
    }

    /// Known page keys.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn has_page(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    /// Total number of AOIs across all pages.
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a registry from a layout, validating every rectangle.
    pub fn from_layout(layout: &AoiLayout) -> SessionResult<Self> {
        let mut registry = Self::new();
        for (page, definitions) in &layout.pages {
            registry.define_page(page.as_str());
            for def in definitions {
                registry.define_aoi(
                    page.as_str(),
                    def.name.as_str(),
                    def.x,
                    def.y,
                    def.width,
                    def.height,
                )?;
            }
        }
        Ok(registry)
    }

    pub fn to_layout(&self) -> AoiLayout {
        let pages = self
            .pages
            .iter()
            .map(|(page, aois)| {
                let defs = aois
                    .iter()
                    .map(|aoi| AoiDefinition {
                        name: aoi.name.clone(),
                        x: aoi.x_min,
                        y: aoi.y_min,
                        width: aoi.width,
                        height: aoi.height,
                    })
                    .collect();
                (page.clone(), defs)
            })
            .collect();
        AoiLayout { pages }
    }

    pub fn from_json(json: &str) -> SessionResult<Self> {
        let layout: AoiLayout = serde_json::from_str(json)?;
        Self::from_layout(&layout)
    }

    /// Load a JSON layout file.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            pages = registry.pages.len(),
            aois = registry.len(),
            "Loaded AOI layout"
        );
        Ok(registry)
    }

    /// Write the registry as a JSON layout file.
    pub fn save(&self, path: &Path) -> SessionResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.to_layout())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Page used when no page is selected.
pub const DEFAULT_PAGE: &str = "home";

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Aoi {
        Aoi::new("square", 0.0, 0.0, 100.0, 100.0).unwrap()
    }

    #[test]
    fn aoi_derives_max_corner() {
        let aoi = Aoi::new("banner", 50.0, 20.0, 200.0, 80.0).unwrap();
        assert_eq!(aoi.x_max, 250.0);
        assert_eq!(aoi.y_max, 100.0);
    }

    #[test]
    fn containment_includes_every_edge() {
        let aoi = square();
        assert!(aoi.contains(100.0, 100.0));
        assert!(aoi.contains(0.0, 50.0));
        assert!(aoi.contains(50.0, 0.0));
        assert!(aoi.contains(100.0, 0.0));
        assert!(!aoi.contains(100.0001, 50.0));
        assert!(!aoi.contains(50.0, -0.5));
    }

    #[test]
    fn zero_sized_aoi_contains_its_corner() {
        let aoi = Aoi::new("dot", 10.0, 10.0, 0.0, 0.0).unwrap();
        assert!(aoi.contains(10.0, 10.0));
        assert!(!aoi.contains(10.0, 10.5));
    }

    #[test]
    fn negative_size_is_rejected() {
        let err = Aoi::new("bad", 0.0, 0.0, -1.0, 10.0).unwrap_err();
        assert!(matches!(err, SessionError::InvalidAoi { .. }));
        assert!(Aoi::new("nan", f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn define_returns_page_scoped_refs() {
        let mut registry = AoiRegistry::new();
        let a = registry.define_aoi("home", "a", 0.0, 0.0, 10.0, 10.0).unwrap();
        let b = registry.define_aoi("cart", "b", 0.0, 0.0, 10.0, 10.0).unwrap();
        let c = registry.define_aoi("home", "c", 0.0, 0.0, 10.0, 10.0).unwrap();

        assert_eq!(a, AoiRef::new("home", 0));
        assert_eq!(b, AoiRef::new("cart", 0));
        assert_eq!(c, AoiRef::new("home", 1));
        assert_eq!(registry.len(), 3);

        let names: Vec<&str> = registry
            .get_all_aois("home")
            .unwrap()
            .iter()
            .map(|aoi| aoi.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn lookups_fail_for_unknown_page_or_index() {
        let mut registry = AoiRegistry::new();
        registry.define_aoi("home", "a", 0.0, 0.0, 10.0, 10.0).unwrap();

        let err = registry.get_all_aois("checkout").unwrap_err();
        assert!(matches!(err, SessionError::PageNotFound { .. }));
        assert!(err.is_lookup());

        let err = registry.get_aoi(&AoiRef::new("home", 3)).unwrap_err();
        assert!(matches!(err, SessionError::AoiNotFound { index: 3, .. }));

        assert!(registry.is_point_in_aoi(1.0, 1.0, &AoiRef::new("cart", 0)).is_err());
    }

    #[test]
    fn empty_page_is_known_but_has_no_aois() {
        let mut registry = AoiRegistry::new();
        registry.define_page("checkout");
        assert!(registry.has_page("checkout"));
        assert!(registry.get_all_aois("checkout").unwrap().is_empty());
        assert!(registry.aoi_refs("checkout").unwrap().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn storefront_default_has_three_home_regions() {
        let registry = AoiRegistry::storefront_default();
        let aois = registry.get_all_aois(DEFAULT_PAGE).unwrap();
        assert_eq!(aois.len(), 3);
        assert_eq!(aois[2].x_max, 850.0);
        assert!(registry
            .is_point_in_aoi(250.0, 100.0, &AoiRef::new("home", 0))
            .unwrap());
    }

    #[test]
    fn layout_json_roundtrip_preserves_order() {
        let json = r#"{
            "pages": {
                "product": [
                    {"name": "gallery", "x": 0, "y": 0, "width": 400, "height": 300},
                    {"x": 420, "y": 0, "width": 200, "height": 60}
                ],
                "cart": []
            }
        }"#;

        let registry = AoiRegistry::from_json(json).unwrap();
        assert_eq!(registry.aoi_refs("product").unwrap().len(), 2);
        assert_eq!(registry.get_aoi(&AoiRef::new("product", 1)).unwrap().name, "");
        assert!(registry.has_page("cart"));

        let layout = registry.to_layout();
        let again = AoiRegistry::from_layout(&layout).unwrap();
        assert_eq!(again.to_layout(), layout);
    }

    #[test]
    fn layout_with_invalid_rectangle_is_rejected() {
        let json = r#"{"pages": {"home": [{"name": "x", "x": 0, "y": 0, "width": -5, "height": 1}]}}"#;
        assert!(AoiRegistry::from_json(json).is_err());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layouts").join("aois.json");

        AoiRegistry::storefront_default().save(&path).unwrap();
        let loaded = AoiRegistry::load(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.pages().collect::<Vec<_>>(), vec!["home"]);
    }
}
