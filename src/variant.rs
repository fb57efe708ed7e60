use std::collections::HashSet;

use tracing::debug;

use crate::error::OrcaMateError;
use crate::profile::catalog::{sized_name, MaterialGroup};
use crate::profile::types::{FilamentProfile, NozzleSize};

/// Allocator for fresh profile identifiers.
///
/// Seeded with every `id` observed during catalog construction, so
/// uniqueness is a function of passed-in state rather than a process-wide
/// variable. Generated ids use the `PFUS` + 16 hex chars shape OrcaSlicer
/// user profiles carry; collisions are retried, not merely hoped-for.
pub struct IdAllocator {
    used: HashSet<String>,
}

impl IdAllocator {
    pub fn new(seed: impl IntoIterator<Item = String>) -> Self {
        Self {
            used: seed.into_iter().collect(),
        }
    }

    /// Generate an id distinct from every id seen so far, and record it
    /// so later calls cannot hand it out again.
    pub fn fresh(&mut self) -> String {
        loop {
            let bytes: [u8; 8] = rand::random();
            let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            let id = format!("PFUS{hex}");
            if self.used.insert(id.clone()) {
                return id;
            }
        }
    }
}

/// Rewrite every standalone size token in `entry` that encodes the source
/// diameter to encode the target diameter instead.
///
/// A token is a maximal run of digits and dots; it matches when it parses
/// to the source diameter (so `"X1C 0.4 nozzle"` rewrites but the `4` in
/// `"X4"` does not). Entries with no matching token are returned
/// untouched -- they are assumed size-agnostic.
pub fn rewrite_size_token(entry: &str, source: NozzleSize, target: NozzleSize) -> String {
    let mut out = String::with_capacity(entry.len());
    let mut rest = entry;
    while let Some(pos) = rest.find(|c: char| c.is_ascii_digit()) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let end = tail
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(tail.len());
        let token = &tail[..end];
        match token
            .parse::<f64>()
            .ok()
            .and_then(|mm| NozzleSize::from_mm(mm).ok())
        {
            Some(size) if size == source => out.push_str(&target.to_string()),
            _ => out.push_str(token),
        }
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

/// Derive a new profile for `target` from the group's `source` variant.
///
/// The source profile is never mutated; the result is a structural copy
/// with a new `name`, a freshly allocated `id`, and `compatible_printers`
/// entries rewritten to the target size. Everything else (including
/// `inherits`) is carried over verbatim.
///
/// Rejects conversions that would overwrite an existing variant or that
/// have nothing to copy from. When `use_base_template` is set, a group
/// lacking the sized source falls back to its base profile as the
/// template.
pub fn generate_variant(
    group: &MaterialGroup,
    source: NozzleSize,
    target: NozzleSize,
    use_base_template: bool,
    ids: &mut IdAllocator,
) -> Result<FilamentProfile, OrcaMateError> {
    if target == source {
        return Err(OrcaMateError::InvalidSize(format!(
            "target size {target}mm equals source size"
        )));
    }
    if group.variants.contains_key(&target) {
        return Err(OrcaMateError::InvalidSize(format!(
            "{} already has a {target}mm variant",
            group.material
        )));
    }
    let entry = group.template_for(source, use_base_template).ok_or_else(|| {
        OrcaMateError::InvalidSize(format!(
            "{} has no {source}mm variant to copy from",
            group.material
        ))
    })?;

    let mut profile = FilamentProfile::from_map(entry.profile.raw().clone());

    let new_name = sized_name(&group.material, target);
    profile.set_string("name", new_name.clone());
    profile.set_string("id", ids.fresh());

    if let Some(printers) = entry.profile.compatible_printers() {
        let rewritten: Vec<String> = printers
            .iter()
            .map(|p| rewrite_size_token(p, source, target))
            .collect();
        profile.set_string_array("compatible_printers", rewritten);
    }

    debug!("Derived {:?} from {:?}", new_name, entry.name);
    Ok(profile)
}
