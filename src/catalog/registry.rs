//! Category registry - the static lookup table of categories
//!
//! Categories are registered once (in code or from a YAML catalog) and are
//! immutable afterwards. Lookups are by [`CategoryId`].

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use rust_embed::Embed;
use serde::Deserialize;

use crate::catalog::category::{Category, CategoryId, CategoryKind, LeafCategory, MainCategory};
use crate::catalog::model::{FailureRateModel, ParametricModel};
use crate::catalog::parameters::{ParameterDef, ParameterSchema};
use crate::core::error::{PredictionError, Result};
use crate::yaml::{parse_yaml, parse_yaml_file};

#[derive(Embed)]
#[folder = "catalogs/"]
struct EmbeddedCatalogs;

const SAMPLE_CATALOG: &str = "sample.yaml";

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    categories: Vec<CategoryRecord>,
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    id: CategoryId,
    name: String,
    #[serde(default)]
    children: Vec<CategoryId>,
    #[serde(default)]
    main_category: Option<String>,
    #[serde(default)]
    parameters: Vec<ParameterDef>,
    #[serde(default)]
    model: Option<ParametricModel>,
}

/// Registry of leaf and composite categories
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    categories: HashMap<CategoryId, Category>,
    order: Vec<CategoryId>,
}

impl CategoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf category with its model
    pub fn register_leaf(
        &mut self,
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        main: MainCategory,
        parameters: &[ParameterDef],
        model: impl FailureRateModel + 'static,
    ) -> Result<()> {
        self.register_leaf_shared(id.into(), name.into(), main, parameters, Arc::new(model))
    }

    fn register_leaf_shared(
        &mut self,
        id: CategoryId,
        name: String,
        main: MainCategory,
        parameters: &[ParameterDef],
        model: Arc<dyn FailureRateModel>,
    ) -> Result<()> {
        let leaf = LeafCategory {
            main,
            schema: ParameterSchema::for_leaf(main, parameters),
            model,
        };
        self.insert(Category {
            id,
            name,
            kind: CategoryKind::Leaf(leaf),
        })
    }

    /// Register a composite category; its children must already be registered
    pub fn register_composite(
        &mut self,
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        children: Vec<CategoryId>,
    ) -> Result<()> {
        if let Some(missing) = children.iter().find(|c| !self.contains(c)) {
            return Err(PredictionError::UnknownCategory(missing.clone()));
        }
        self.insert(Category {
            id: id.into(),
            name: name.into(),
            kind: CategoryKind::Composite { children },
        })
    }

    fn insert(&mut self, category: Category) -> Result<()> {
        if self.categories.contains_key(&category.id) {
            return Err(PredictionError::DuplicateId(category.id.to_string()));
        }
        self.order.push(category.id.clone());
        self.categories.insert(category.id.clone(), category);
        Ok(())
    }

    /// Parse a YAML catalog
    pub fn from_yaml_str(content: &str, filename: &str) -> Result<Self> {
        let document: CatalogDocument = parse_yaml(content, filename)?;
        Self::from_document(document)
    }

    /// Load a YAML catalog from disk
    pub fn load(path: &Path) -> Result<Self> {
        let document: CatalogDocument = parse_yaml_file(path)?;
        Self::from_document(document)
    }

    /// The small sample catalog shipped with the crate
    pub fn sample() -> Result<Self> {
        let file = EmbeddedCatalogs::get(SAMPLE_CATALOG).ok_or_else(|| {
            PredictionError::InvalidCatalog(format!("{} is not embedded", SAMPLE_CATALOG))
        })?;
        let content = std::str::from_utf8(&file.data)
            .map_err(|e| PredictionError::InvalidCatalog(e.to_string()))?;
        Self::from_yaml_str(content, SAMPLE_CATALOG)
    }

    fn from_document(document: CatalogDocument) -> Result<Self> {
        let mut registry = Self::new();

        for record in document.categories {
            if record.children.is_empty() {
                let main = match &record.main_category {
                    Some(value) => value.parse::<MainCategory>().map_err(|_| {
                        PredictionError::UnknownMainCategory {
                            category: record.id.clone(),
                            value: value.clone(),
                        }
                    })?,
                    None => {
                        return Err(PredictionError::InvalidCatalog(format!(
                            "leaf category {} has no main_category",
                            record.id
                        )))
                    }
                };
                let model = record.model.unwrap_or_default();
                registry.register_leaf_shared(
                    record.id,
                    record.name,
                    main,
                    &record.parameters,
                    Arc::new(model),
                )?;
            } else {
                if record.model.is_some() {
                    return Err(PredictionError::InvalidCatalog(format!(
                        "composite category {} cannot carry a model",
                        record.id
                    )));
                }
                // Children may be declared later in the file; checked below
                registry.insert(Category {
                    id: record.id,
                    name: record.name,
                    kind: CategoryKind::Composite {
                        children: record.children,
                    },
                })?;
            }
        }

        registry.check_children()?;
        Ok(registry)
    }

    fn check_children(&self) -> Result<()> {
        for category in self.iter() {
            if let Some(missing) = category.children().iter().find(|c| !self.contains(c)) {
                return Err(PredictionError::UnknownCategory(missing.clone()));
            }
        }
        Ok(())
    }

    /// Look up any category
    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.categories.contains_key(id)
    }

    /// Look up a category that must be a leaf
    pub fn leaf(&self, id: &CategoryId) -> Result<&LeafCategory> {
        self.get(id)
            .ok_or_else(|| PredictionError::UnknownCategory(id.clone()))?
            .as_leaf()
            .ok_or_else(|| PredictionError::NotALeaf(id.clone()))
    }

    /// Direct children of a category
    pub fn children(&self, id: &CategoryId) -> Result<Vec<&Category>> {
        let category = self
            .get(id)
            .ok_or_else(|| PredictionError::UnknownCategory(id.clone()))?;
        Ok(category
            .children()
            .iter()
            .filter_map(|child| self.get(child))
            .collect())
    }

    /// All categories in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.order.iter().filter_map(|id| self.categories.get(id))
    }

    /// All leaf categories in registration order
    pub fn leaves(&self) -> impl Iterator<Item = &Category> {
        self.iter().filter(|c| c.is_leaf())
    }

    /// Categories that are nobody's child
    pub fn roots(&self) -> Vec<&Category> {
        let children: HashSet<&CategoryId> =
            self.iter().flat_map(|c| c.children().iter()).collect();
        self.iter().filter(|c| !children.contains(&c.id)).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Specification;
    use crate::core::error::ErrorKind;

    fn small_registry() -> CategoryRegistry {
        let mut registry = CategoryRegistry::new();
        registry
            .register_leaf(
                "capacitor.ceramic",
                "Ceramic capacitor",
                MainCategory::Capacitor,
                &[],
                ParametricModel::constant(0.10, 0.01, 0.05, 4.1),
            )
            .unwrap();
        registry
            .register_composite(
                "capacitor",
                "Capacitors",
                vec![CategoryId::from("capacitor.ceramic")],
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = small_registry();
        assert_eq!(registry.len(), 2);

        let leaf = registry.leaf(&"capacitor.ceramic".into()).unwrap();
        assert_eq!(leaf.main, MainCategory::Capacitor);
        let out = leaf.model.evaluate(&Specification::new()).unwrap();
        assert_eq!(out.base_rate, 0.10);
    }

    #[test]
    fn test_leaf_lookup_errors() {
        let registry = small_registry();
        assert!(matches!(
            registry.leaf(&"capacitor".into()),
            Err(PredictionError::NotALeaf(_))
        ));
        let err = registry.leaf(&"relay".into()).unwrap_err();
        assert!(matches!(err, PredictionError::UnknownCategory(_)));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = small_registry();
        let err = registry
            .register_leaf(
                "capacitor.ceramic",
                "Again",
                MainCategory::Capacitor,
                &[],
                ParametricModel::default(),
            )
            .unwrap_err();
        assert!(matches!(err, PredictionError::DuplicateId(_)));
    }

    #[test]
    fn test_composite_requires_children() {
        let mut registry = CategoryRegistry::new();
        let err = registry
            .register_composite("resistor", "Resistors", vec!["resistor.film".into()])
            .unwrap_err();
        assert!(matches!(err, PredictionError::UnknownCategory(_)));
    }

    #[test]
    fn test_roots_and_children() {
        let registry = small_registry();
        let roots = registry.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id.as_str(), "capacitor");

        let children = registry.children(&"capacitor".into()).unwrap();
        assert_eq!(children.len(), 1);
        assert!(children[0].is_leaf());
        assert_eq!(registry.leaves().count(), 1);
    }

    #[test]
    fn test_from_yaml_forward_children() {
        let yaml = r#"
categories:
  - id: resistor
    name: Resistors
    children: [resistor.film]
  - id: resistor.film
    name: Film resistor
    main_category: resistor
    parameters:
      - name: resistance_ohm
        min: 0
        required: true
    model:
      base_rate: 0.5
      base_std: 0.05
      temp_curve: 0.15
      elec_curve: 0.6
"#;
        let registry = CategoryRegistry::from_yaml_str(yaml, "test.yaml").unwrap();
        let leaf = registry.leaf(&"resistor.film".into()).unwrap();
        assert_eq!(leaf.main, MainCategory::Resistor);
        assert!(leaf.schema.get("resistance_ohm").is_some());
        assert!(leaf.schema.get("p_rated").is_some());
    }

    #[test]
    fn test_from_yaml_unknown_main_category() {
        let yaml = r#"
categories:
  - id: relay.reed
    name: Reed relay
    main_category: relay
"#;
        let err = CategoryRegistry::from_yaml_str(yaml, "test.yaml").unwrap_err();
        assert!(
            matches!(err, PredictionError::UnknownMainCategory { ref value, .. } if value == "relay")
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_yaml_dangling_child() {
        let yaml = r#"
categories:
  - id: diode
    name: Diodes
    children: [diode.zener]
"#;
        let err = CategoryRegistry::from_yaml_str(yaml, "test.yaml").unwrap_err();
        assert!(matches!(err, PredictionError::UnknownCategory(_)));
    }

    #[test]
    fn test_from_yaml_composite_with_model() {
        let yaml = r#"
categories:
  - id: a.leaf
    name: Leaf
    main_category: other
  - id: a
    name: Group
    children: [a.leaf]
    model:
      base_rate: 1.0
"#;
        let err = CategoryRegistry::from_yaml_str(yaml, "test.yaml").unwrap_err();
        assert!(matches!(err, PredictionError::InvalidCatalog(_)));
    }

    #[test]
    fn test_from_yaml_syntax_error() {
        let err = CategoryRegistry::from_yaml_str("categories: [", "bad.yaml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_sample_catalog_loads() {
        let registry = CategoryRegistry::sample().unwrap();
        assert!(registry.leaves().count() >= 6);
        for leaf in registry.leaves() {
            assert!(leaf.as_leaf().is_some());
        }
        assert!(registry.roots().iter().all(|c| !c.is_leaf()));
    }
}
