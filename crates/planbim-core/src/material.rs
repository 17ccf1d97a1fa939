use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Concrete,
    Brick,
    Partition,
    Generic,
}

impl Material {
    pub fn color(self) -> &'static str {
        match self {
            Material::Concrete => "#A9A9A9",
            Material::Brick => "#CD5C5C",
            Material::Partition | Material::Generic => "#999999",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRule {
    pub material: Material,
    pub keywords: Vec<String>,
}

/// Layer-name keyword rules and the thickness (meters) a single-line wall of
/// each material is assumed to have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub rules: Vec<MaterialRule>,
    pub concrete_thickness: f64,
    pub brick_thickness: f64,
    pub partition_thickness: f64,
    pub generic_thickness: f64,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        let rule = |material, words: &[&str]| MaterialRule {
            material,
            keywords: words.iter().map(|w| w.to_string()).collect(),
        };
        Self {
            rules: vec![
                rule(
                    Material::Concrete,
                    &["MONOLIT", "BETON", "ЖЕЛЕЗОБЕТОН", "CONCRETE", "МОНОЛИТ"],
                ),
                rule(
                    Material::Brick,
                    &["GAS", "BLOCK", "ГАЗОБЛОК", "KIRPICH", "BRICK", "БЛОК", "КИРПИЧ"],
                ),
                rule(
                    Material::Partition,
                    &["PEREG", "GKL", "PARTITION", "ПЕРЕГОРОДКИ", "ГКЛ"],
                ),
            ],
            concrete_thickness: 0.2,
            brick_thickness: 0.2,
            partition_thickness: 0.1,
            generic_thickness: 0.1,
        }
    }
}

impl MaterialConfig {
    /// First rule with a keyword contained in the upper-cased layer wins.
    pub fn classify(&self, layer: &str) -> Material {
        self.rules
            .iter()
            .find(|rule| layer_matches(layer, &rule.keywords))
            .map(|rule| rule.material)
            .unwrap_or(Material::Generic)
    }

    pub fn assumed_thickness(&self, material: Material) -> f64 {
        match material {
            Material::Concrete => self.concrete_thickness,
            Material::Brick => self.brick_thickness,
            Material::Partition => self.partition_thickness,
            Material::Generic => self.generic_thickness,
        }
    }
}

/// Case-insensitive substring match against any keyword.
pub fn layer_matches(layer: &str, keywords: &[String]) -> bool {
    let layer = layer.to_uppercase();
    keywords.iter().any(|k| layer.contains(&k.to_uppercase()))
}
