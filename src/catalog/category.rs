//! Category tree - leaf categories carry a model, composites group children

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::model::FailureRateModel;
use crate::catalog::parameters::ParameterSchema;

/// Category identifier (e.g. `capacitor.ceramic`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Main component family; selects how the operating stress ratio is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainCategory {
    Capacitor,
    Resistor,
    Diode,
    Transistor,
    IntegratedCircuit,
    Other,
}

impl MainCategory {
    /// Optional stress inputs this family accepts in a specification
    pub fn stress_parameters(&self) -> &'static [&'static str] {
        match self {
            MainCategory::Capacitor => &["v_dc", "v_ac", "v_rated"],
            MainCategory::Resistor => &["p_applied", "p_rated"],
            MainCategory::Diode => &["i_applied", "i_rated", "v_applied", "v_rated"],
            MainCategory::Transistor => &["p_dissipated", "p_rated", "v_applied", "v_rated"],
            MainCategory::IntegratedCircuit => &["v_applied", "v_rated"],
            MainCategory::Other => &[],
        }
    }
}

impl fmt::Display for MainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainCategory::Capacitor => write!(f, "capacitor"),
            MainCategory::Resistor => write!(f, "resistor"),
            MainCategory::Diode => write!(f, "diode"),
            MainCategory::Transistor => write!(f, "transistor"),
            MainCategory::IntegratedCircuit => write!(f, "integrated_circuit"),
            MainCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for MainCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "capacitor" | "capacitors" => Ok(MainCategory::Capacitor),
            "resistor" | "resistors" => Ok(MainCategory::Resistor),
            "diode" | "diodes" => Ok(MainCategory::Diode),
            "transistor" | "transistors" => Ok(MainCategory::Transistor),
            "integrated_circuit" | "ic" => Ok(MainCategory::IntegratedCircuit),
            "other" => Ok(MainCategory::Other),
            _ => Err(format!(
                "Invalid main category: {}. Use capacitor, resistor, diode, transistor, integrated_circuit, or other",
                s
            )),
        }
    }
}

/// A category that can be calculated
#[derive(Debug, Clone)]
pub struct LeafCategory {
    pub main: MainCategory,
    pub schema: ParameterSchema,
    pub model: Arc<dyn FailureRateModel>,
}

/// Leaf or composite
#[derive(Debug, Clone)]
pub enum CategoryKind {
    Leaf(LeafCategory),
    Composite { children: Vec<CategoryId> },
}

/// A node of the category tree
#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub kind: CategoryKind,
}

impl Category {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, CategoryKind::Leaf(_))
    }

    /// The leaf data, if this is a leaf
    pub fn as_leaf(&self) -> Option<&LeafCategory> {
        match &self.kind {
            CategoryKind::Leaf(leaf) => Some(leaf),
            CategoryKind::Composite { .. } => None,
        }
    }

    /// Child ids (empty for leaves)
    pub fn children(&self) -> &[CategoryId] {
        match &self.kind {
            CategoryKind::Leaf(_) => &[],
            CategoryKind::Composite { children } => children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_category_parse() {
        assert_eq!(
            "Capacitor".parse::<MainCategory>().unwrap(),
            MainCategory::Capacitor
        );
        assert_eq!(
            "integrated-circuit".parse::<MainCategory>().unwrap(),
            MainCategory::IntegratedCircuit
        );
        assert_eq!("IC".parse::<MainCategory>().unwrap(), MainCategory::IntegratedCircuit);
        assert!("relay".parse::<MainCategory>().is_err());
    }

    #[test]
    fn test_main_category_display_roundtrip() {
        for main in [
            MainCategory::Capacitor,
            MainCategory::Resistor,
            MainCategory::Diode,
            MainCategory::Transistor,
            MainCategory::IntegratedCircuit,
            MainCategory::Other,
        ] {
            assert_eq!(main.to_string().parse::<MainCategory>().unwrap(), main);
        }
    }

    #[test]
    fn test_stress_parameters() {
        assert_eq!(
            MainCategory::Resistor.stress_parameters(),
            &["p_applied", "p_rated"]
        );
        assert!(MainCategory::Other.stress_parameters().is_empty());
    }

    #[test]
    fn test_category_id() {
        let id = CategoryId::from("capacitor.ceramic");
        assert_eq!(id.as_str(), "capacitor.ceramic");
        assert_eq!(id.to_string(), "capacitor.ceramic");
    }
}
