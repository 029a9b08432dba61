use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    #[cfg(test)]
    pub fn leaf(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            category: None,
            value: Some(value),
            children: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn branch(name: &str, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.to_string(),
            category: None,
            value: None,
            children,
        }
    }

    #[cfg(test)]
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn aggregate_value(&self) -> f64 {
        if self.is_leaf() {
            self.value.unwrap_or(0.0)
        } else {
            self.children.iter().map(TreeNode::aggregate_value).sum()
        }
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(TreeNode::leaf_count).sum()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

// Sales fixtures ship leaf values as strings ("20.32").
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrText> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(NumberOrText::Number(v)) => Ok(Some(v)),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid numeric value: {s:?}"))),
    }
}
