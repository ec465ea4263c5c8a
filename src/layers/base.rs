#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    GridLines,
    GridLabels,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::GridLines => write!(f, "grid-lines"),
            LayerType::GridLabels => write!(f, "grid-labels"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    /// Stacking order; higher layers are composed on top.
    pub z_index: i32,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        let z_index = match layer_type {
            LayerType::GridLines => 0,
            LayerType::GridLabels => 1,
        };
        Self {
            id,
            name,
            layer_type,
            z_index,
        }
    }
}
