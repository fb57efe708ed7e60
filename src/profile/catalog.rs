use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::reader::{list_profile_files, read_profile};
use super::types::{FilamentProfile, NozzleSize};
use crate::error::OrcaMateError;

/// Split a profile display name into its material and nozzle-size parts.
///
/// Names follow the `"<material> @ <size>mm"` grammar. The suffix match
/// is case-insensitive and tolerant of whitespace (`"PLA @ 0.4 mm"`
/// parses). A name without a parseable suffix is a base profile and
/// yields `None` for the size.
pub fn split_name(name: &str) -> (String, Option<NozzleSize>) {
    if let Some(at) = name.rfind('@') {
        let material = name[..at].trim_end();
        let suffix = name[at + 1..].trim().to_ascii_lowercase();
        if let Some(number) = suffix.strip_suffix("mm") {
            if let Ok(size) = number.trim().parse::<NozzleSize>() {
                if !material.is_empty() {
                    return (material.to_string(), Some(size));
                }
            }
        }
    }
    (name.trim().to_string(), None)
}

/// Render the display name for a sized variant of a material.
pub fn sized_name(material: &str, size: NozzleSize) -> String {
    format!("{material} @ {size}mm")
}

/// One discovered profile file: where it lives and what it parsed to.
pub struct CatalogEntry {
    pub path: PathBuf,
    pub name: String,
    pub profile: FilamentProfile,
}

/// All profiles sharing one material, keyed by nozzle size.
///
/// The `base` entry is the material-level profile with no size suffix;
/// it is not tied to any specific nozzle.
pub struct MaterialGroup {
    pub material: String,
    pub base: Option<CatalogEntry>,
    pub variants: BTreeMap<NozzleSize, CatalogEntry>,
}

impl MaterialGroup {
    fn new(material: String) -> Self {
        Self {
            material,
            base: None,
            variants: BTreeMap::new(),
        }
    }

    /// The entry a conversion from `source` would copy from: the exact
    /// sized variant, or the base profile when `use_base_template` is
    /// set and no sized variant exists.
    pub fn template_for(
        &self,
        source: NozzleSize,
        use_base_template: bool,
    ) -> Option<&CatalogEntry> {
        self.variants.get(&source).or_else(|| {
            if use_base_template {
                self.base.as_ref()
            } else {
                None
            }
        })
    }

    pub fn profile_count(&self) -> usize {
        self.variants.len() + usize::from(self.base.is_some())
    }
}

/// The result of scanning one profile directory: material groups in
/// name order, every observed `id` (the seed for fresh-id allocation),
/// and the non-fatal problems encountered along the way.
pub struct ProfileCatalog {
    pub dir: PathBuf,
    pub groups: BTreeMap<String, MaterialGroup>,
    pub known_ids: HashSet<String>,
    pub warnings: Vec<String>,
}

impl ProfileCatalog {
    /// Scan `dir` and group every readable profile by material.
    ///
    /// Malformed files are skipped with a warning. Two files resolving
    /// to the same `(material, nozzle_size)` pair is a malformed-catalog
    /// condition: the first file (in sorted listing order) wins and the
    /// later one is recorded as a warning, keeping the run deterministic.
    pub fn build(dir: &Path) -> Result<Self, OrcaMateError> {
        debug!("Scanning profile directory: {:?}", dir);

        let mut groups: BTreeMap<String, MaterialGroup> = BTreeMap::new();
        let mut known_ids = HashSet::new();
        let mut warnings = Vec::new();

        for path in list_profile_files(dir)? {
            let profile = match read_profile(&path) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping unreadable profile at {:?}: {}", path, e);
                    warnings.push(e.to_string());
                    continue;
                }
            };

            // Both fields validated present by read_profile
            let name = profile.name().unwrap_or_default().to_string();
            known_ids.insert(profile.id().unwrap_or_default().to_string());

            let (material, size) = split_name(&name);
            debug!("Found profile: {:?} -> {}/{:?}", path, material, size);

            let group = groups
                .entry(material.clone())
                .or_insert_with(|| MaterialGroup::new(material.clone()));
            let entry = CatalogEntry {
                path: path.clone(),
                name,
                profile,
            };

            match size {
                Some(size) => {
                    if group.variants.contains_key(&size) {
                        let msg = format!(
                            "duplicate profile for {material} @ {size}mm: {} (keeping first)",
                            path.display()
                        );
                        warn!("{}", msg);
                        warnings.push(msg);
                    } else {
                        group.variants.insert(size, entry);
                    }
                }
                None => {
                    if group.base.is_some() {
                        let msg = format!(
                            "duplicate base profile for {material}: {} (keeping first)",
                            path.display()
                        );
                        warn!("{}", msg);
                        warnings.push(msg);
                    } else {
                        group.base = Some(entry);
                    }
                }
            }
        }

        info!(
            "Discovered {} material groups with {} profiles in {:?}",
            groups.len(),
            groups.values().map(MaterialGroup::profile_count).sum::<usize>(),
            dir
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            groups,
            known_ids,
            warnings,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn profile_count(&self) -> usize {
        self.groups.values().map(MaterialGroup::profile_count).sum()
    }
}
