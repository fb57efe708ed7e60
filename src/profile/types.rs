use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::error::OrcaMateError;

/// An OrcaSlicer filament profile.
///
/// Wraps the raw JSON `Map<String, Value>` to preserve ALL fields without
/// needing a typed struct for every field. Typed accessors are provided
/// for the fields orcamate actively manipulates (`id`, `name`,
/// `compatible_printers`); every other key is opaque payload that must
/// round-trip unchanged.
#[derive(Debug, Clone)]
pub struct FilamentProfile {
    data: Map<String, Value>,
}

impl FilamentProfile {
    /// Parse a filament profile from a JSON string.
    ///
    /// The object must carry string `id` and `name` fields; anything
    /// else is a malformed profile. The returned error is the reason
    /// only; callers attach the file path.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let data: Map<String, Value> =
            serde_json::from_str(json).map_err(|e| e.to_string())?;
        let profile = Self { data };
        for field in ["id", "name"] {
            match profile.data.get(field) {
                Some(Value::String(_)) => {}
                Some(_) => return Err(format!("field `{field}` is not a string")),
                None => return Err(format!("missing required field `{field}`")),
            }
        }
        Ok(profile)
    }

    /// Construct a FilamentProfile from an existing Map.
    ///
    /// Used when deriving a variant from a source profile's map; the
    /// caller is responsible for the required fields being present.
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Serialize to JSON with 4-space indentation (matching OrcaSlicer's
    /// own format) and a trailing newline.
    pub fn to_json_4space(&self) -> Result<String, OrcaMateError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        self.data.serialize(&mut ser)?;
        let mut s = String::from_utf8(buf).map_err(|e| {
            OrcaMateError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            ))
        })?;
        if !s.ends_with('\n') {
            s.push('\n');
        }
        Ok(s)
    }

    // --- Typed accessors ---

    /// Unique profile identifier (bare string field).
    pub fn id(&self) -> Option<&str> {
        self.data.get("id")?.as_str()
    }

    /// Profile display name, e.g. `"PLA @ 0.4mm"`.
    pub fn name(&self) -> Option<&str> {
        self.data.get("name")?.as_str()
    }

    /// Parent profile name for inheritance (bare string field).
    /// Preserved verbatim on derived variants.
    pub fn inherits(&self) -> Option<&str> {
        self.data.get("inherits")?.as_str()
    }

    /// Compatible printers -- array of printer+nozzle strings.
    pub fn compatible_printers(&self) -> Option<Vec<&str>> {
        self.data
            .get("compatible_printers")?
            .as_array()?
            .iter()
            .map(|v| v.as_str())
            .collect()
    }

    // --- Mutators ---

    /// Set a bare string field (not array-wrapped).
    pub fn set_string(&mut self, key: &str, value: String) {
        self.data.insert(key.to_string(), Value::String(value));
    }

    /// Set a string array field.
    pub fn set_string_array(&mut self, key: &str, values: Vec<String>) {
        let arr: Vec<Value> = values.into_iter().map(Value::String).collect();
        self.data.insert(key.to_string(), Value::Array(arr));
    }

    // --- Raw access ---

    /// Get a reference to the underlying map.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Number of fields in the profile.
    pub fn field_count(&self) -> usize {
        self.data.len()
    }
}

/// A nozzle diameter, stored as integer microns so it can be hashed,
/// ordered, and compared without floating-point surprises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NozzleSize {
    microns: u32,
}

impl NozzleSize {
    /// Construct from a diameter in millimeters. Rejects zero, negative,
    /// and non-finite values.
    pub fn from_mm(mm: f64) -> Result<Self, OrcaMateError> {
        if !mm.is_finite() || mm <= 0.0 {
            return Err(OrcaMateError::InvalidSize(format!(
                "nozzle size must be a positive number, got {mm}"
            )));
        }
        Ok(Self {
            microns: (mm * 1000.0).round() as u32,
        })
    }

    /// Diameter in millimeters.
    pub fn mm(&self) -> f64 {
        self.microns as f64 / 1000.0
    }
}

impl FromStr for NozzleSize {
    type Err = OrcaMateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mm: f64 = s.trim().parse().map_err(|_| {
            OrcaMateError::InvalidSize(format!("not a number: {s:?}"))
        })?;
        Self::from_mm(mm)
    }
}

impl fmt::Display for NozzleSize {
    /// Minimal decimal representation: `0.4`, not `0.40`; `1`, not `1.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mm())
    }
}
